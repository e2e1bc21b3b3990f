//! Static registry of every editable content block on the marketing site.
//!
//! One `SectionSchema` per page/section replaces a copy of the editor per
//! page: the generic editor and the admin forms are driven entirely by the
//! flags and fallback content declared here.

use crate::sections::SectionRecord;

/// Shape and behavior of one section editor.
#[derive(Debug)]
pub struct SectionSchema {
    pub page: &'static str,
    pub section: &'static str,
    pub label: &'static str,
    pub has_subtitle: bool,
    pub has_description: bool,
    pub has_content: bool,
    pub has_image: bool,
    pub has_slides: bool,
    /// Save is rejected client-side unless an image URL is present.
    pub requires_image: bool,
    /// Slides below this count cannot be removed.
    pub min_slides: usize,
    /// On save failure, commit the submitted values locally and report
    /// success anyway (offline/demo editing).
    pub demo_mode_save: bool,
    /// How long the "saved" banner stays up. `None` clears it on the next
    /// render tick.
    pub success_linger_secs: Option<u64>,
    pub fallback: Fallback,
}

/// Hardcoded placeholder content shown when the backend read fails, so the
/// admin form is always renderable.
#[derive(Debug)]
pub struct Fallback {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub description: Option<&'static str>,
    pub content: Option<&'static str>,
    pub image_url: Option<&'static str>,
    pub slides: &'static [&'static str],
}

impl SectionSchema {
    pub fn key(&self) -> String {
        format!("{}/{}", self.page, self.section)
    }

    pub fn fallback_record(&self) -> SectionRecord {
        SectionRecord {
            id: None,
            title: self.fallback.title.to_string(),
            subtitle: self.fallback.subtitle.map(str::to_string),
            description: self.fallback.description.map(str::to_string),
            content: self.fallback.content.map(str::to_string),
            image_url: self.fallback.image_url.map(str::to_string),
            slides: self.fallback.slides.iter().map(|s| s.to_string()).collect(),
            is_active: true,
        }
    }
}

const NO_EXTRAS: Fallback = Fallback {
    title: "",
    subtitle: None,
    description: None,
    content: None,
    image_url: None,
    slides: &[],
};

const SECTIONS: &[SectionSchema] = &[
    SectionSchema {
        page: "about",
        section: "hero",
        label: "About — Hero Banner",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: false,
        has_slides: true,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: true,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "ABOUT US",
            subtitle: Some("Who we are and what drives us"),
            slides: &["/assets/img/about-hero-1.jpg", "/assets/img/about-hero-2.jpg"],
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "about",
        section: "company",
        label: "About — Company Profile",
        has_subtitle: false,
        has_description: false,
        has_content: true,
        has_image: true,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "Our Company",
            content: Some(
                "A diversified group with three decades of operations across \
                 energy, mobility and environmental services.",
            ),
            image_url: Some("/assets/img/about-company.jpg"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "contact",
        section: "hero",
        label: "Contact — Hero Banner",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: true,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "CONTACT US",
            subtitle: Some("We would love to hear from you"),
            image_url: Some("/assets/img/contact-hero.jpg"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "contact",
        section: "details",
        label: "Contact — Office Details",
        has_subtitle: false,
        has_description: true,
        has_content: true,
        has_image: false,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: None,
        fallback: Fallback {
            title: "Registered Office",
            description: Some("Corporate headquarters and regional offices"),
            content: Some("1st Floor, Corporate Tower, Business District"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "esg",
        section: "hero",
        label: "ESG — Hero Carousel",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: false,
        has_slides: true,
        requires_image: false,
        // The carousel must never render empty
        min_slides: 1,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "ENVIRONMENT, SOCIAL & GOVERNANCE",
            subtitle: Some("Sustainability at the core of everything we do"),
            slides: &["/assets/img/esg-hero-1.jpg"],
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "esg",
        section: "commitments",
        label: "ESG — Commitments",
        has_subtitle: false,
        has_description: true,
        has_content: true,
        has_image: false,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: None,
        fallback: Fallback {
            title: "Our Commitments",
            description: Some("Measurable goals, reported annually"),
            content: Some("Net-zero roadmap, community programs and governance standards."),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "green-mobility",
        section: "hero",
        label: "Green Mobility — Hero Banner",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: true,
        has_slides: false,
        // The page design breaks without a banner image
        requires_image: true,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "GREEN MOBILITY",
            subtitle: Some("Electric fleets for a cleaner tomorrow"),
            image_url: Some("/assets/img/green-mobility-hero.jpg"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "green-mobility",
        section: "overview",
        label: "Green Mobility — Overview",
        has_subtitle: false,
        has_description: true,
        has_content: true,
        has_image: false,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: None,
        fallback: Fallback {
            title: "Fleet Electrification",
            description: Some("EV fleet operations and charging infrastructure"),
            content: Some("End-to-end electric mobility services for enterprise customers."),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "refrigerant-gas",
        section: "hero",
        label: "Refrigerant Gas — Hero Banner",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: true,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "REFRIGERANT GASES",
            subtitle: Some("Trusted supplier since 1989"),
            image_url: Some("/assets/img/refrigerant-hero.jpg"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "ash-utilization",
        section: "hero",
        label: "Ash Utilization — Hero Banner",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: true,
        has_slides: false,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "ASH UTILIZATION",
            subtitle: Some("Turning coal ash into construction value"),
            image_url: Some("/assets/img/ash-hero.jpg"),
            ..NO_EXTRAS
        },
    },
    SectionSchema {
        page: "venwind-refex",
        section: "hero",
        label: "Venwind Refex — Hero Carousel",
        has_subtitle: true,
        has_description: false,
        has_content: false,
        has_image: false,
        has_slides: true,
        requires_image: false,
        min_slides: 0,
        demo_mode_save: false,
        success_linger_secs: Some(3),
        fallback: Fallback {
            title: "VENWIND REFEX",
            subtitle: Some("Wind energy components, engineered in India"),
            slides: &["/assets/img/venwind-hero-1.jpg"],
            ..NO_EXTRAS
        },
    },
];

pub fn registry() -> &'static [SectionSchema] {
    SECTIONS
}

pub fn find(page: &str, section: &str) -> Option<&'static SectionSchema> {
    SECTIONS
        .iter()
        .find(|s| s.page == page && s.section == section)
}
