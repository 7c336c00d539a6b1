//! FineReader XML parsing module.

mod abbyy_parser;
mod layout;
mod options;
mod page_reader;

pub use abbyy_parser::{parse_page_fragment, AbbyyParser};
pub use layout::{merge_split_blocks, ColumnEdges};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use page_reader::PageReader;
