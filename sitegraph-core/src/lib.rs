pub mod crawl;
pub mod error;
pub mod export;
pub mod report;

use colored::Colorize;

pub use error::ExportError;

const BANNER: &str = r#"
     _ _                             _
 ___(_) |_ ___  __ _ _ __ __ _ _ __ | |__
/ __| | __/ _ \/ _` | '__/ _` | '_ \| '_ \
\__ \ | ||  __/ (_| | | | (_| | |_) | | | |
|___/_|\__\___|\__, |_|  \__,_| .__/|_| |_|
               |___/          |_|
"#;

pub fn banner() -> String {
    format!(
        "{}\n  {} v{}\n",
        BANNER.cyan(),
        "link graph crawler".dimmed(),
        env!("CARGO_PKG_VERSION")
    )
}

pub fn print_banner() {
    eprintln!("{}", banner());
}
