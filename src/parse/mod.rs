pub mod markdown_parser;
pub mod markdown_serializer;

pub use markdown_parser::{parse_markdown, parse_markdown_with_report, DropReason, DroppedLine};
pub use markdown_serializer::format_markdown;
