pub mod conll;

use gloss_protocol::{CoarsePos, DependencyRole, EntityLabel, FinePos, Paragraph, Sentence, Token};
use log::debug;
use thiserror::Error;

use crate::conll::{classify_line, Line, Row};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("line {line}: malformed annotation row '{content}'")]
    Malformed { line: usize, content: String },
    #[error("line {line}: expected token id {expected}, found {found}")]
    OutOfOrder { line: usize, expected: usize, found: usize },
    #[error("line {line}: token {id} is governed by {head}, which is not in its sentence")]
    DanglingHead { line: usize, id: usize, head: usize },
    #[error("no annotation available for paragraph '{0}'")]
    UnknownParagraph(String),
    #[error("annotator returned {actual} paragraph(s) for {expected} input(s)")]
    ParagraphCountMismatch { expected: usize, actual: usize },
}

/// The linguistic annotation service: splits each paragraph into sentences and
/// annotates every token. Punctuation never reaches the caller.
pub trait Annotator {
    /// Returns exactly one paragraph per input text, in input order.
    fn annotate(&self, paragraphs: &[String]) -> Result<Vec<Paragraph>, AnnotationError>;
}

impl<T: Annotator + ?Sized> Annotator for &T {
    fn annotate(&self, paragraphs: &[String]) -> Result<Vec<Paragraph>, AnnotationError> {
        (**self).annotate(paragraphs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedParagraph {
    /// Sentence texts joined by a single space.
    pub text: String,
    pub sentences: Paragraph,
}

/// Serves annotation that a dependency parser produced ahead of time in the
/// CoNLL-style format of [`conll`].
#[derive(Debug, Clone, Default)]
pub struct ConllAnnotator {
    paragraphs: Vec<AnnotatedParagraph>,
}

impl ConllAnnotator {
    pub fn parse(input: &str) -> Result<Self, AnnotationError> {
        Ok(Self { paragraphs: parse_document(input)? })
    }

    pub fn paragraphs(&self) -> &[AnnotatedParagraph] {
        &self.paragraphs
    }

    /// Raw paragraph texts, in document order.
    pub fn texts(&self) -> Vec<String> {
        self.paragraphs.iter().map(|p| p.text.clone()).collect()
    }
}

impl Annotator for ConllAnnotator {
    fn annotate(&self, paragraphs: &[String]) -> Result<Vec<Paragraph>, AnnotationError> {
        paragraphs
            .iter()
            .map(|text| {
                let key = normalize(text);
                self.paragraphs
                    .iter()
                    .find(|p| normalize(&p.text) == key)
                    .map(|p| p.sentences.clone())
                    .ok_or_else(|| AnnotationError::UnknownParagraph(text.clone()))
            })
            .collect()
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a single sentence block (no paragraph markers needed).
pub fn parse_sentence(input: &str) -> Result<Sentence, AnnotationError> {
    let paragraphs = parse_document(input)?;
    Ok(paragraphs
        .into_iter()
        .flat_map(|p| p.sentences)
        .next()
        .unwrap_or_default())
}

/// Parses a whole annotation document into paragraphs of sentences.
pub fn parse_document(input: &str) -> Result<Vec<AnnotatedParagraph>, AnnotationError> {
    let mut builder = DocumentBuilder::default();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        match classify_line(raw) {
            Some(Line::Row(row)) => builder.push_row(line_no, row)?,
            Some(Line::Text(text)) => builder.sentence_text = Some(text.to_string()),
            Some(Line::Blank) => builder.finish_sentence()?,
            Some(Line::NewParagraph) => {
                builder.finish_sentence()?;
                builder.finish_paragraph();
            }
            Some(Line::Comment) => {}
            None => {
                return Err(AnnotationError::Malformed {
                    line: line_no,
                    content: raw.to_string(),
                })
            }
        }
    }

    builder.finish_sentence()?;
    builder.finish_paragraph();
    Ok(builder.paragraphs)
}

#[derive(Default)]
struct DocumentBuilder<'a> {
    rows: Vec<(usize, Row<'a>)>,
    sentence_text: Option<String>,
    texts: Vec<String>,
    sentences: Paragraph,
    paragraphs: Vec<AnnotatedParagraph>,
}

impl<'a> DocumentBuilder<'a> {
    fn push_row(&mut self, line: usize, row: Row<'a>) -> Result<(), AnnotationError> {
        let expected = self.rows.len() + 1;
        if row.id != expected {
            return Err(AnnotationError::OutOfOrder { line, expected, found: row.id });
        }
        self.rows.push((line, row));
        Ok(())
    }

    fn finish_sentence(&mut self) -> Result<(), AnnotationError> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let rows = std::mem::take(&mut self.rows);
        let text = self
            .sentence_text
            .take()
            .unwrap_or_else(|| rows.iter().map(|(_, r)| r.form).collect::<Vec<_>>().join(" "));

        let sentence = build_sentence(&rows)?;
        self.texts.push(text);
        if sentence.is_empty() {
            debug!("Dropping punctuation-only sentence at line {}", rows[0].0);
        } else {
            self.sentences.push(sentence);
        }
        Ok(())
    }

    fn finish_paragraph(&mut self) {
        if self.texts.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.texts).join(" ");
        let sentences = std::mem::take(&mut self.sentences);
        debug!("Annotated paragraph with {} sentence(s): '{}'", sentences.len(), text);
        self.paragraphs.push(AnnotatedParagraph { text, sentences });
    }
}

/// Maps one sentence's rows to tokens: drops punctuation, renumbers positions
/// from 0 and re-attaches anything that hung off punctuation to the root.
fn build_sentence(rows: &[(usize, Row<'_>)]) -> Result<Sentence, AnnotationError> {
    let count = rows.len();
    for (line, row) in rows {
        if row.head > count {
            return Err(AnnotationError::DanglingHead { line: *line, id: row.id, head: row.head });
        }
    }

    // CoNLL id (1-based) -> new position, None for punctuation
    let mut positions: Vec<Option<usize>> = vec![None; count + 1];
    let mut next = 0;
    for (_, row) in rows {
        if CoarsePos::from_tag(row.upos) != CoarsePos::Punctuation {
            positions[row.id] = Some(next);
            next += 1;
        }
    }

    let root_position = rows
        .iter()
        .find(|(_, r)| r.head == 0)
        .and_then(|(_, r)| positions[r.id])
        .unwrap_or(0);

    let tokens = rows
        .iter()
        .filter_map(|(_, row)| {
            let position = positions[row.id]?;
            let head = match row.head {
                0 => position,
                h => positions[h].unwrap_or(root_position),
            };
            let dependency = if row.deprel.eq_ignore_ascii_case("root") {
                DependencyRole::Root
            } else {
                DependencyRole::from_tag(row.deprel)
            };
            Some(
                Token::new(position, row.form, row.lemma)
                    .with_pos(CoarsePos::from_tag(row.upos), FinePos::from_tag(row.xpos))
                    .with_dependency(dependency, head)
                    .with_entity(row.entity.map(EntityLabel::from_tag)),
            )
        })
        .collect();

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "\
# newpar
# text = Hello.
1\tHello\thello\tINTJ\tUH\t0\tROOT\t_
2\t.\t.\tPUNCT\t.\t1\tpunct\t_

# text = Mother gives me 40 baht.
1\tMother\tmother\tNOUN\tNN\t2\tnsubj\t_
2\tgives\tgive\tVERB\tVBZ\t0\tROOT\t_
3\tme\tI\tPRON\tPRP\t2\tdative\t_
4\t40\t40\tNUM\tCD\t5\tnummod\tCARDINAL
5\tbaht\tbaht\tNOUN\tNN\t2\tdobj\t_
6\t.\t.\tPUNCT\t.\t2\tpunct\t_

# newpar
# text = The chickens walk.
1\tThe\tthe\tDET\tDT\t2\tdet\t_
2\tchickens\tchicken\tNOUN\tNNS\t3\tnsubj\t_
3\twalk\twalk\tVERB\tVBP\t0\tROOT\t_
4\t.\t.\tPUNCT\t.\t3\tpunct\t_
";

    #[test]
    fn test_document_paragraphs_and_sentences() {
        let paragraphs = parse_document(DOCUMENT).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "Hello. Mother gives me 40 baht.");
        assert_eq!(paragraphs[0].sentences.len(), 2);
        assert_eq!(paragraphs[1].sentences[0].len(), 3);
    }

    #[test]
    fn test_punctuation_is_stripped_and_tags_mapped() {
        let paragraphs = parse_document(DOCUMENT).unwrap();
        let sentence = &paragraphs[0].sentences[1];
        assert_eq!(sentence.len(), 5);

        let forty = &sentence.tokens()[3];
        assert_eq!(forty.position, 3);
        assert_eq!(forty.head, 4);
        assert_eq!(forty.fine_pos, FinePos::CardinalNumber);
        assert_eq!(forty.entity, Some(EntityLabel::Cardinal));

        let root = sentence.root().unwrap();
        assert_eq!(root.lemma, "give");
        assert_eq!(root.dependency, DependencyRole::Root);
        assert_eq!(root.head, root.position);
    }

    #[test]
    fn test_heads_pointing_at_punctuation_move_to_root() {
        let input = "\
1\tYes\tyes\tINTJ\tUH\t2\tintj\t_
2\t,\t,\tPUNCT\t,\t3\tpunct\t_
3\tgo\tgo\tVERB\tVB\t0\tROOT\t_
";
        // Malformed-but-seen-in-the-wild: "Yes" attached to the comma.
        let sentence = parse_sentence(input).unwrap();
        assert_eq!(sentence.len(), 2);
        assert_eq!(sentence.tokens()[0].head, 1);
        assert_eq!(sentence.tokens()[1].position, 1);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let out_of_order = "1\tA\ta\tDET\tDT\t2\tdet\n3\tdog\tdog\tNOUN\tNN\t0\tROOT\n";
        assert_eq!(
            parse_document(out_of_order),
            Err(AnnotationError::OutOfOrder { line: 2, expected: 2, found: 3 })
        );

        let dangling = "1\tdog\tdog\tNOUN\tNN\t7\tROOT\n";
        assert!(matches!(
            parse_document(dangling),
            Err(AnnotationError::DanglingHead { line: 1, id: 1, head: 7 })
        ));

        let garbage = "# text = x\nnot a row\n";
        assert!(matches!(parse_document(garbage), Err(AnnotationError::Malformed { line: 2, .. })));
    }

    #[test]
    fn test_annotator_matches_paragraphs_by_text() {
        let annotator = ConllAnnotator::parse(DOCUMENT).unwrap();
        let request = vec!["The  chickens walk.".to_string(), "Hello. Mother gives me 40 baht.".to_string()];
        let paragraphs = annotator.annotate(&request).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0][0].tokens()[1].lemma, "chicken");

        let missing = annotator.annotate(&["Unseen text.".to_string()]);
        assert_eq!(missing, Err(AnnotationError::UnknownParagraph("Unseen text.".to_string())));
    }
}
