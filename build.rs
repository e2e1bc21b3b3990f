use std::process::Command;

fn main() {
    // Only rebuild CSS when template or CSS files change
    println!("cargo:rerun-if-changed=assets/css/input.css");
    println!("cargo:rerun-if-changed=templates/");

    // Try to run Tailwind CSS standalone CLI
    let status = Command::new("tailwindcss")
        .args([
            "-i",
            "assets/css/input.css",
            "-o",
            "assets/css/admin.css",
            "--minify",
        ])
        .status();

    match status {
        Ok(s) if s.success() => {
            println!("cargo:warning=Tailwind CSS compiled successfully");
        }
        _ => {
            // Tailwind CLI not available - write a minimal fallback stylesheet
            println!("cargo:warning=Tailwind CLI not found, using fallback CSS");
            let fallback = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.5; color: #111827; background: #f9fafb; }
.container { max-width: 48rem; margin: 0 auto; padding: 2rem 1rem; }
h1 { font-size: 1.5rem; margin-bottom: 1rem; }
h2 { font-size: 1.125rem; margin: 1.5rem 0 0.5rem; }
a { color: #1d4ed8; text-decoration: none; }
a:hover { text-decoration: underline; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; }
label { display: block; font-size: 0.875rem; font-weight: 600; margin: 0.75rem 0 0.25rem; }
input[type=text], textarea { width: 100%; padding: 0.5rem; border: 1px solid #d1d5db; border-radius: 0.375rem; font: inherit; }
textarea { min-height: 6rem; }
button { padding: 0.5rem 1rem; border: none; border-radius: 0.375rem; background: #111827; color: #fff; cursor: pointer; font: inherit; }
button:hover { background: #374151; }
button.secondary { background: #fff; color: #111827; border: 1px solid #d1d5db; }
.banner { padding: 0.75rem 1rem; border-radius: 0.375rem; margin-bottom: 1rem; }
.banner.error { background: #fef2f2; color: #991b1b; border: 1px solid #fecaca; }
.banner.success { background: #f0fdf4; color: #166534; border: 1px solid #bbf7d0; }
.banner.fallback { background: #fffbeb; color: #92400e; border: 1px solid #fde68a; }
.slide-row { display: flex; gap: 0.5rem; align-items: center; margin-bottom: 0.5rem; }
.slide-row input { flex: 1; }
.muted { color: #6b7280; font-size: 0.875rem; }
"#;
            std::fs::create_dir_all("assets/css").ok();
            std::fs::write("assets/css/admin.css", fallback).ok();
        }
    }
}
