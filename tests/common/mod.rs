#![allow(dead_code)]

use std::sync::Once;

use tinyquery::Document;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub const PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
        <head>
            <style>
                p { color: black; margin: 0 }
                .note { color: green }
                #intro { color: red }
                .note { margin: 4px }
            </style>
        </head>
        <body>
            <main id="main" class="layout">
                <section id="first" class="card">
                    <p id="intro" class="note lead">Hello <b>world</b></p>
                    <p class="note">Second</p>
                </section>
                <section id="second" class="card">
                    <p class="note" style="color: blue">Third</p>
                    <a href="/x" data-kind="link">x</a>
                </section>
            </main>
        </body>
    </html>
"#;

pub fn page() -> Document {
    init_tracing();
    Document::parse(PAGE)
}
