pub mod blocks;
pub mod inline;
pub mod markdown;
pub mod normalize;

pub use blocks::{blocks_to_plain_text, render_blocks, Block};
pub use inline::{parse_inline, Span};
pub use markdown::render_markdown;
pub use normalize::normalize;
