mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::StageProgressView;
use styling::{brand, muted};
pub use summary::{print_rate_limit, print_summary};

/// Prints the autopr banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("🤖 autopr"),
        muted(env!("CARGO_PKG_VERSION")),
        muted("AI-powered pull request automation")
    );
}
