use std::sync::LazyLock;

use regex::Regex;

/// Any char except a line terminator (`\n`, `\r`, U+2028, U+2029).
const ANY: &str = r"[^\n\r\x{2028}\x{2029}]";

/// Matches the escaped `title`/`artist`/`teaserURL` run inside the page's
/// embedded JSON. Values keep their escape sequences.
static TEASER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\\"title\\":\\"(?P<title>{ANY}*?)\\",\\"artist\\":\\"(?P<artist>{ANY}*?)\\",{ANY}*?\\"teaserURL\\":\\"(?P<url>{ANY}*?)\\""#
    ))
    .unwrap()
});

/// A title may not run across a field boundary.
const FIELD_BREAK: &str = r#"\",\""#;

/// Captured straight from page text, still escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTriple<'t> {
    pub title: &'t str,
    pub artist: &'t str,
    pub url: &'t str,
}

/// Turns raw page text into raw triples.
pub trait Extractor {
    fn extract<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = RawTriple<'a>> + 'a>;
}

/// Regex scan over the `teaserURL` layout used by the chart pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeaserPattern;

impl Extractor for TeaserPattern {
    fn extract<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = RawTriple<'a>> + 'a> {
        Box::new(TeaserMatches { text, pos: 0 })
    }
}

/// Non-overlapping, left to right.
pub struct TeaserMatches<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for TeaserMatches<'t> {
    type Item = RawTriple<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let caps = TEASER_RE.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            let title = caps.name("title")?;

            // No field break may start inside the title, even one that runs
            // past its end. The lazy title is the shortest one at this start
            // and any longer one holds the same break, so nothing matches
            // here. Every match begins with a one-byte '\', so start + 1 is a
            // char boundary.
            let breaks_title = self.text[title.start()..]
                .find(FIELD_BREAK)
                .is_some_and(|i| i < title.len());
            if breaks_title {
                self.pos = whole.start() + 1;
                continue;
            }

            self.pos = whole.end();
            return Some(RawTriple {
                title: title.as_str(),
                artist: caps.name("artist")?.as_str(),
                url: caps.name("url")?.as_str(),
            });
        }
        None
    }
}
