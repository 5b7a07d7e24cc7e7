use crate::config::{BookType, Config, ScanConfig};
use crate::error::AppError;
use crate::formats::color::Color;
use crate::formats::{self, NoteFormat};
use crate::library::files::BookFiles;
use crate::library::{Note, NoteStyle, Scanner, Statistics, scanner};
use crate::stream;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;
use std::path::Path;

const PDF_NOTE: &str = "245#A*#8#A1#1451496313379#A2#291#A3#301#A4#-256#A5#0#A6##A7# sample_text_1#A@#";

const FB2_NOTES: &str = "343599
indent:false
trim:false
#
2984
Sample book title
/sdcard/Books/MoonReader/Book.fb2.zip
/sdcard/books/moonreader/book.fb2.zip
2
0
222
131
-16711936
1441449604670

my remark
Some text
1
0
1
#
2985
Sample book title
/sdcard/Books/MoonReader/Book.fb2.zip
/sdcard/books/moonreader/book.fb2.zip
3
0
10
6
-256
1436185081862


Gone
0
0
*DELETED*
";

fn zlib(text: &str) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn scan_config(workers: usize) -> ScanConfig {
    ScanConfig {
        workers,
        ..ScanConfig::default()
    }
}

fn write(dir: &Path, name: &str, data: &[u8]) {
    std::fs::write(dir.join(name), data).unwrap();
}

#[test]
fn statistics_sample_record() {
    let stats = formats::decode_statistics(b"1392540515970*15@0#6095:7.8%").unwrap();
    assert_eq!(stats.timestamp(), 1392540515970);
    assert_eq!(stats.pages(), 15);
    assert_eq!(stats.percentage(), 7.8);
}

#[test]
fn statistics_empty_buffer_is_empty_value() {
    let stats = formats::decode_statistics(&[]).unwrap();
    assert_eq!(stats, Statistics::empty());
    assert!(stats.is_empty());
    assert_eq!(stats.timestamp(), 0);
}

#[test]
fn statistics_encode_decode_preserves_values() {
    for stats in [
        Statistics::new(1392540515970, 15, 7.8),
        Statistics::new(0, 0, 0.0),
        Statistics::new(1, 320, 100.0),
        Statistics::new(1451686942123, 7, 33.333333333333336),
    ] {
        let bytes = formats::encode_statistics(&stats, false).unwrap();
        assert_eq!(formats::decode_statistics(&bytes).unwrap(), stats);

        let bytes = formats::encode_statistics(&stats, true).unwrap();
        assert!(stream::is_compressed(&bytes));
        assert_eq!(formats::decode_statistics(&bytes).unwrap(), stats);
    }
}

#[test]
fn statistics_garbage_is_malformed() {
    assert!(matches!(
        formats::decode_statistics(b"not a record"),
        Err(AppError::MalformedStatistics(_))
    ));
}

#[test]
fn statistics_emptiness() {
    assert!(Statistics::new(5, 0, 0.0).is_empty());
    assert!(!Statistics::new(0, 0, 2.0).is_empty());
    assert!(!Statistics::new(0, 2, 0.0).is_empty());
}

#[test]
fn pdf_sample_note() {
    let notes = formats::decode_notes(PDF_NOTE.as_bytes(), BookType::Pdf).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text(), " sample_text_1");
    assert_eq!(notes[0].style(), NoteStyle::Selected);
    assert_eq!(notes[0].manual_note(), "");
}

#[test]
fn fb2_notes_with_deletion_marker() {
    let notes = formats::decode_notes(FB2_NOTES.as_bytes(), BookType::Fb2).unwrap();
    assert_eq!(notes.len(), 2);

    assert_eq!(notes[0].text(), "Some text");
    assert_eq!(notes[0].manual_note(), "my remark");
    assert_eq!(notes[0].modifier(), 5);
    assert_eq!(notes[0].style(), NoteStyle::Selected);

    assert_eq!(notes[1].style(), NoteStyle::Deleted);
    assert!(notes[1].is_deleted());
    assert_eq!(notes[1].created().timestamp(), 1436185081);
}

#[test]
fn epub_uses_fb2_codec() {
    let fb2 = formats::decode_notes(FB2_NOTES.as_bytes(), BookType::Fb2).unwrap();
    let epub = formats::decode_notes(FB2_NOTES.as_bytes(), BookType::Epub).unwrap();
    assert_eq!(fb2, epub);
}

#[test]
fn unsupported_book_types_rejected() {
    for book_type in [BookType::Txt, BookType::Mobi, BookType::Zip] {
        assert!(matches!(
            formats::decode_notes(PDF_NOTE.as_bytes(), book_type),
            Err(AppError::UnsupportedBookType(_))
        ));
        assert!(NoteFormat::for_book_type(book_type).is_err());
    }
}

#[test]
fn empty_notes_file_has_no_notes() {
    assert!(formats::decode_notes(&[], BookType::Fb2).unwrap().is_empty());
    assert!(formats::decode_notes(&[], BookType::Pdf).unwrap().is_empty());
}

#[test]
fn color_overflow_encoding() {
    assert_eq!(Color::from_argb_int(255), Color::new(0, 0, 0, 255));
    assert_eq!(Color::new(0, 0, 0, 255).to_argb_int(), 255);
}

#[test]
fn notes_survive_reencoding() {
    for (text, book_type) in [(PDF_NOTE, BookType::Pdf), (FB2_NOTES, BookType::Fb2)] {
        let notes = formats::decode_notes(text.as_bytes(), book_type).unwrap();
        for compress in [false, true] {
            let bytes = formats::encode_notes(&notes, book_type, compress).unwrap();
            let again = formats::decode_notes(&bytes, book_type).unwrap();
            assert_eq!(again, notes, "{} compress={}", book_type, compress);
        }
    }
}

#[test]
fn compressed_input_matches_plain() {
    for (text, book_type) in [(PDF_NOTE, BookType::Pdf), (FB2_NOTES, BookType::Fb2)] {
        let plain = formats::decode_notes(text.as_bytes(), book_type).unwrap();
        let packed = formats::decode_notes(&zlib(text), book_type).unwrap();
        assert_eq!(plain, packed);
    }
}

#[test]
fn corrupt_stream_is_decompression_error() {
    let mut data = zlib(FB2_NOTES);
    data.truncate(data.len() / 2);
    assert!(matches!(
        formats::decode_notes(&data, BookType::Fb2),
        Err(AppError::Decompression(_))
    ));
}

#[test]
fn note_builder_defaults() {
    let created = chrono::DateTime::from_timestamp(1451686942, 0).unwrap();
    let note = Note::new("text", created).with_manual_note("Some remark");

    assert_eq!(note.text(), "text");
    assert_eq!(note.created(), created);
    assert_eq!(note.style(), NoteStyle::Selected);
    assert_eq!(note.color(), Color::new(0, 255, 255, 255));
    assert_eq!(note.manual_note(), "Some remark");
    assert_eq!(note.rgb_hex(), "#FFFFFF");
}

#[test]
fn note_serializes_for_export() {
    let created = chrono::DateTime::from_timestamp(0, 0).unwrap();
    let note = Note::new("quote", created)
        .with_style(NoteStyle::WavyUnderline)
        .with_color(Color::from_argb_int(-256));

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["text"], "quote");
    assert_eq!(json["style"], "wavy_underline");
    assert_eq!(json["color"], serde_json::json!([255, 255, 255, 0]));
    assert_eq!(json["note"], "");
    assert_eq!(json["created"], "1970-01-01T00:00:00Z");
}

#[test]
fn scanner_reads_paired_books() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Alpha.pdf.an", PDF_NOTE.as_bytes());
    write(dir.path(), "Alpha.pdf.po", b"1392540515970*15@0#6095:7.8%");
    write(dir.path(), "Beta.fb2.zip.an", &zlib(FB2_NOTES));
    write(dir.path(), "Gamma.epub.po", b"");
    write(dir.path(), "readme.txt", b"ignored");

    let scanner = Scanner::new(scan_config(2));
    let entries = scanner.scan(dir.path()).unwrap();
    assert_eq!(entries.len(), 3);

    let books: Vec<_> = entries.into_iter().map(|e| e.result.unwrap()).collect();

    assert_eq!(books[0].title, "Alpha");
    assert_eq!(books[0].book_type, Some(BookType::Pdf));
    assert_eq!(books[0].pages(), 15);
    assert_eq!(books[0].notes.len(), 1);

    assert_eq!(books[1].title, "Beta");
    assert_eq!(books[1].book_type, Some(BookType::Fb2));
    assert!(books[1].stats.is_empty());
    assert_eq!(books[1].notes.len(), 2);
    assert_eq!(books[1].live_notes().count(), 1);

    assert_eq!(books[2].title, "Gamma");
    assert!(books[2].notes.is_empty());
    assert!(books[2].stats.is_empty());
}

#[test]
fn scanner_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Bad.pdf.po", b"garbage");
    write(dir.path(), "Good.pdf.po", b"1*2:3%");
    write(dir.path(), "Unknown.zip.an", b"1\n2\n3\n");

    let scanner = Scanner::new(scan_config(4));
    let entries = scanner.scan(dir.path()).unwrap();
    assert_eq!(entries.len(), 3);

    assert!(matches!(
        entries[0].result,
        Err(AppError::MalformedStatistics(_))
    ));
    assert_eq!(entries[1].result.as_ref().unwrap().pages(), 2);
    assert!(matches!(
        entries[2].result,
        Err(AppError::UnsupportedBookType(_))
    ));
}

#[test]
fn statistics_survive_unreadable_notes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Plain.txt.an", b"anything");
    write(dir.path(), "Plain.txt.po", b"1*40:25%");
    write(dir.path(), "Odd.djvu.an", b"anything");
    write(dir.path(), "Odd.djvu.po", b"1*8:50%");

    let entries = Scanner::new(scan_config(2)).scan(dir.path()).unwrap();
    assert_eq!(entries.len(), 2);

    let odd = entries[0].result.as_ref().unwrap();
    assert_eq!(odd.book_type, None);
    assert_eq!(odd.pages(), 8);
    assert!(odd.notes.is_empty());

    let plain = entries[1].result.as_ref().unwrap();
    assert_eq!(plain.book_type, Some(BookType::Txt));
    assert_eq!(plain.pages(), 40);
    assert_eq!(plain.percentage(), 25.0);
    assert!(plain.notes.is_empty());
}

#[test]
fn fb2_hash_line_refused_on_encode() {
    let created = formats::decode_notes(FB2_NOTES.as_bytes(), BookType::Fb2).unwrap()[0]
        .created();
    let notes = [
        Note::new("#", created),
        Note::new("ok", created).with_manual_note("#"),
    ];
    for note in notes {
        assert!(matches!(
            formats::encode_notes(&[note], BookType::Fb2, false),
            Err(AppError::MalformedNoteRecord(_))
        ));
    }
}

#[test]
fn scanner_respects_book_count() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.pdf.po", "b.pdf.po", "c.pdf.po"] {
        write(dir.path(), name, b"1*2:3%");
    }

    let config = ScanConfig {
        book_count: Some(2),
        ..scan_config(1)
    };
    let entries = Scanner::new(config).scan(dir.path()).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn cancelled_scan_skips_books() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.pdf.po", b"1*2:3%");

    let scanner = Scanner::new(scan_config(1));
    scanner.cancel_token().cancel();

    let entries = scanner.scan(dir.path()).unwrap();
    assert!(matches!(entries[0].result, Err(AppError::Cancelled(_))));
}

#[test]
fn scanner_rejects_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        Scanner::new(scan_config(1)).scan(&missing),
        Err(AppError::InvalidPath(_))
    ));
}

#[test]
fn read_book_without_files_fails() {
    assert!(scanner::read_book(&BookFiles::default()).is_err());
}

#[test]
fn book_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Alpha.pdf.an", PDF_NOTE.as_bytes());
    write(dir.path(), "Alpha.pdf.po", b"1392540515970*15:7.8%");

    let files = BookFiles {
        notes: Some(dir.path().join("Alpha.pdf.an")),
        stats: Some(dir.path().join("Alpha.pdf.po")),
    };
    let book = scanner::read_book(&files).unwrap();
    let json = serde_json::to_value(&book).unwrap();

    assert_eq!(json["title"], "Alpha");
    assert_eq!(json["book_type"], "pdf");
    assert_eq!(json["pages"], 15);
    assert_eq!(json["percentage"], 7.8);
    assert_eq!(json["notes"][0]["text"], " sample_text_1");
    assert_eq!(book.to_string(), "Alpha: 1 notes");
}

#[test]
fn export_document_shape() {
    let books = [crate::library::Book::new("Alpha"), crate::library::Book::new("Beta")];
    let export = crate::library::Export::new(&books);

    let compact = export.to_json(false).unwrap();
    assert!(!compact.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(value["books"][1]["title"], "Beta");
    assert_eq!(value["books"][0]["notes"], serde_json::json!([]));

    assert!(export.to_json(true).unwrap().contains('\n'));
}

#[test]
fn book_ids_are_stable() {
    let a = crate::library::Book::new("Same title");
    let b = crate::library::Book::new("Same title");
    assert_eq!(a.id, b.id);
    assert_ne!(a.id, crate::library::Book::new("Other").id);
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.scan.workers, 8);
    assert!(config.scan.skip_failed);
    assert!(!config.output.pretty);

    let config = Config::parse("[scan]\nworkers = 2\nbook_count = 10\n[output]\npretty = true\n")
        .unwrap();
    assert_eq!(config.scan.workers, 2);
    assert_eq!(config.scan.book_count, Some(10));
    assert!(config.output.pretty);

    assert!(Config::parse(&Config::generate_default()).is_ok());
    assert!(matches!(
        Config::parse("[scan]\nworkers = 0\n"),
        Err(AppError::Config(_))
    ));
}

#[test]
fn book_type_parsing() {
    assert_eq!("PDF".parse::<BookType>().unwrap(), BookType::Pdf);
    assert_eq!("epub".parse::<BookType>().unwrap(), BookType::Epub);
    assert!("djvu".parse::<BookType>().is_err());
}
