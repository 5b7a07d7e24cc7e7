pub mod book;
pub mod files;
pub mod note;
pub mod scanner;
pub mod stats;

pub use book::{Book, Export};
pub use files::{BookFiles, book_type_from_file_name, pair_book_files, title_from_file_name};
pub use note::{Note, NoteStyle};
pub use scanner::{CancelToken, ScanEntry, Scanner};
pub use stats::Statistics;
