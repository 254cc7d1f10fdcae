use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt},
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// One token row exactly as the annotator wrote it.
///
/// Columns: `ID FORM LEMMA UPOS XPOS HEAD DEPREL [ENT]`, tab separated.
/// `HEAD` is 1-based with `0` for the root; `ENT` is `_`, `O` or absent when
/// the token is not part of a named entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub id: usize,
    pub form: &'a str,
    pub lemma: &'a str,
    pub upos: &'a str,
    pub xpos: &'a str,
    pub head: usize,
    pub deprel: &'a str,
    pub entity: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Row(Row<'a>),
    /// `# newpar`: the following sentences open a new paragraph.
    NewParagraph,
    /// `# text = ...`: the raw text of the sentence that follows.
    Text(&'a str),
    /// Any other `#` comment.
    Comment,
    /// Sentence boundary.
    Blank,
}

fn tab(input: &str) -> IResult<&str, char> {
    char('\t')(input)
}

fn column(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '\t')(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

pub fn parse_row(input: &str) -> IResult<&str, Row<'_>> {
    let (rest, (id, form, lemma, upos, xpos, head, deprel)) = tuple((
        terminated(index, tab),
        terminated(column, tab),
        terminated(column, tab),
        terminated(column, tab),
        terminated(column, tab),
        terminated(index, tab),
        column,
    ))(input)?;
    let (rest, entity) = opt(preceded(tab, column))(rest)?;

    let entity = entity.filter(|e| *e != "_" && *e != "O");

    Ok((
        rest,
        Row { id, form, lemma, upos, xpos, head, deprel, entity },
    ))
}

/// Classifies one physical line. `None` means the line is not valid annotation.
pub fn classify_line(raw: &str) -> Option<Line<'_>> {
    let line = raw.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return Some(Line::Blank);
    }

    if let Some(comment) = line.strip_prefix('#') {
        let comment = comment.trim();
        if comment.starts_with("newpar") {
            return Some(Line::NewParagraph);
        }
        if let Some(text) = comment.strip_prefix("text") {
            if let Some(text) = text.trim_start().strip_prefix('=') {
                return Some(Line::Text(text.trim()));
            }
        }
        return Some(Line::Comment);
    }

    all_consuming(parse_row)(line).ok().map(|(_, row)| Line::Row(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_entity() {
        let (_, row) = parse_row("3\t40\t40\tNUM\tCD\t4\tnummod\tCARDINAL").unwrap();
        assert_eq!(row.id, 3);
        assert_eq!(row.form, "40");
        assert_eq!(row.head, 4);
        assert_eq!(row.deprel, "nummod");
        assert_eq!(row.entity, Some("CARDINAL"));
    }

    #[test]
    fn test_row_without_entity_column() {
        let (rest, row) = parse_row("1\tShe\tshe\tPRON\tPRP\t2\tnsubj").unwrap();
        assert!(rest.is_empty());
        assert_eq!(row.entity, None);

        let (_, row) = parse_row("1\tShe\tshe\tPRON\tPRP\t2\tnsubj\t_").unwrap();
        assert_eq!(row.entity, None);
    }

    #[test]
    fn test_line_classification() {
        assert_eq!(classify_line(""), Some(Line::Blank));
        assert_eq!(classify_line("   \r"), Some(Line::Blank));
        assert_eq!(classify_line("# newpar"), Some(Line::NewParagraph));
        assert_eq!(classify_line("# newpar id = p2"), Some(Line::NewParagraph));
        assert_eq!(classify_line("# text = She eats an apple."), Some(Line::Text("She eats an apple.")));
        assert_eq!(classify_line("# sent_id = 1"), Some(Line::Comment));
        assert!(matches!(classify_line("2\teats\teat\tVERB\tVBZ\t0\tROOT\r"), Some(Line::Row(_))));
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        // Missing columns
        assert_eq!(classify_line("1\tShe\tshe"), None);
        // Multiword token ranges are not supported
        assert_eq!(classify_line("1-2\tdon't\t_\t_\t_\t_\t_"), None);
        // Non-numeric head
        assert_eq!(classify_line("1\tShe\tshe\tPRON\tPRP\tx\tnsubj"), None);
    }
}
