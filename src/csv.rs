//! CSV transcoding for bulk import and export of the song collection. The
//! splitter honors quoted fields (embedded delimiters, embedded newlines, and
//! doubled-quote escapes) so lyrics survive the round trip. Import is
//! all-or-nothing: the first invalid row aborts the whole batch with a
//! line-numbered error and the existing collection stays untouched.

use thiserror::Error;

use crate::models::{Category, Song, SongDraft};

/// Header row written on export. Import treats row one as a header without
/// reading it; columns are positional.
pub const CSV_HEADER: &str = "title,category,mnemonic,lyrics,mediaLink";

/// Row validation failures surfaced to the import dialog. Row numbers are
/// 1-based with the header counted as row 1, so the first data row is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("the CSV file must contain a header row and at least one data row")]
    MissingData,
    #[error("a title or a mnemonic phrase is required on row {row}")]
    MissingTitle { row: usize },
    #[error("invalid category \"{value}\" on row {row}")]
    InvalidCategory { row: usize, value: String },
}

/// Split raw CSV text into rows of fields. A double quote toggles quoted
/// mode; inside quotes, commas and line breaks are literal and a doubled
/// quote encodes one quote character. CR, LF, and CRLF all terminate rows.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut value = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                if in_quotes {
                    value.push(ch);
                } else {
                    if !value.is_empty() || !row.is_empty() {
                        row.push(std::mem::take(&mut value));
                        rows.push(std::mem::take(&mut row));
                    }
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                }
            }
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    value.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut value));
            }
            _ => value.push(ch),
        }
    }

    if !value.is_empty() || !row.is_empty() {
        row.push(value);
        rows.push(row);
    }

    rows
}

/// Parse import text into typed drafts. Stops at the first invalid row; the
/// caller only ever commits a fully valid batch.
pub fn parse_import(text: &str) -> Result<Vec<SongDraft>, ImportError> {
    let rows = split_rows(text);
    if rows.len() < 2 {
        return Err(ImportError::MissingData);
    }

    let mut drafts = Vec::with_capacity(rows.len() - 1);
    for (index, values) in rows.iter().skip(1).enumerate() {
        drafts.push(parse_row(index + 2, values)?);
    }
    Ok(drafts)
}

/// Convert one data row into a typed draft, or reject it with its row
/// number. Missing trailing columns read as empty fields.
fn parse_row(row: usize, values: &[String]) -> Result<SongDraft, ImportError> {
    let field = |index: usize| values.get(index).map(String::as_str).unwrap_or("");

    let title = field(0);
    let raw_category = field(1);
    let mnemonic = field(2);

    if title.is_empty() && mnemonic.is_empty() {
        return Err(ImportError::MissingTitle { row });
    }

    let category = Category::parse(raw_category).ok_or_else(|| ImportError::InvalidCategory {
        row,
        value: raw_category.to_string(),
    })?;

    Ok(SongDraft {
        title: title.to_string(),
        category,
        mnemonic: mnemonic.to_string(),
        lyrics: field(3).to_string(),
        media_link: field(4).to_string(),
    })
}

/// Serialize the collection, header first, one row per song in current
/// order. Text fields are individually quoted with internal quotes doubled;
/// the category is a restricted enumeration and is written bare.
pub fn export(songs: &[Song]) -> String {
    let mut lines = Vec::with_capacity(songs.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for song in songs {
        lines.push(format!(
            "{},{},{},{},{}",
            quote(&song.title),
            song.category.wire_name(),
            quote(&song.mnemonic),
            quote(&song.lyrics),
            quote(&song.media_link),
        ));
    }
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn draft(title: &str, category: Category) -> SongDraft {
        SongDraft {
            title: title.to_string(),
            category,
            ..SongDraft::default()
        }
    }

    #[test]
    fn test_split_rows_handles_quoted_delimiters_and_newlines() {
        let text = "a,\"b,c\",\"line one\nline two\"\nd,e,f";
        let rows = split_rows(text);
        assert_eq!(
            rows,
            vec![
                vec![
                    "a".to_string(),
                    "b,c".to_string(),
                    "line one\nline two".to_string()
                ],
                vec!["d".to_string(), "e".to_string(), "f".to_string()],
            ]
        );
    }

    #[test]
    fn test_split_rows_decodes_doubled_quotes() {
        let rows = split_rows("\"say \"\"iê\"\"\",rest");
        assert_eq!(
            rows,
            vec![vec!["say \"iê\"".to_string(), "rest".to_string()]]
        );
    }

    #[test]
    fn test_split_rows_accepts_crlf_line_endings() {
        let rows = split_rows("a,b\r\nc,d\r\n");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_import_requires_header_and_data() {
        assert_eq!(parse_import(""), Err(ImportError::MissingData));
        assert_eq!(parse_import(CSV_HEADER), Err(ImportError::MissingData));
    }

    #[test]
    fn test_parse_import_reports_invalid_category_with_row_number() {
        let text = format!(
            "{CSV_HEADER}\n\"Valid\",angola,\"\",\"\",\"\"\n\"Broken\",maculele,\"\",\"\",\"\""
        );
        assert_eq!(
            parse_import(&text),
            Err(ImportError::InvalidCategory {
                row: 3,
                value: "maculele".to_string()
            })
        );
    }

    #[test]
    fn test_parse_import_reports_missing_title_and_mnemonic_with_row_number() {
        let text = format!("{CSV_HEADER}\n\"\",angola,\"\",\"some lyrics\",\"\"");
        assert_eq!(
            parse_import(&text),
            Err(ImportError::MissingTitle { row: 2 })
        );
    }

    #[test]
    fn test_parse_import_accepts_mnemonic_only_rows() {
        let text = format!("{CSV_HEADER}\n\"\",saoBentoPequeno,\"Ai ai aidê\",\"\",\"\"");
        let drafts = parse_import(&text).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].mnemonic, "Ai ai aidê");
        assert_eq!(drafts[0].category, Category::SaoBentoPequeno);
    }

    #[test]
    fn test_export_quotes_text_fields_and_leaves_category_bare() {
        let song = Song::from_draft(
            "id".to_string(),
            SongDraft {
                title: "Quem vem lá".to_string(),
                category: Category::Angola,
                mnemonic: "sou \"eu\"".to_string(),
                lyrics: "first\nsecond".to_string(),
                media_link: String::new(),
            },
        );
        let text = export(std::slice::from_ref(&song));
        let expected = format!(
            "{CSV_HEADER}\n\"Quem vem lá\",angola,\"sou \"\"eu\"\"\",\"first\nsecond\",\"\""
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let songs: Vec<Song> = [
            SongDraft {
                lyrics: "Coro: paranauê\nparanauê, paraná".to_string(),
                media_link: "https://example.com/a".to_string(),
                ..draft("Paranauê", Category::Angola)
            },
            SongDraft {
                mnemonic: "with, comma".to_string(),
                ..draft("Santa Maria", Category::SaoBentoPequeno)
            },
            draft("Zum Zum Zum", Category::SaoBentoGrande),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, d)| Song::from_draft(format!("id-{index}"), d))
        .collect();

        let drafts = parse_import(&export(&songs)).unwrap();
        assert_eq!(drafts.len(), songs.len());
        for (song, reimported) in songs.iter().zip(&drafts) {
            assert_eq!(&song.draft(), reimported);
        }
    }
}
