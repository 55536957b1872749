//! Searchable select: a list of options narrowed by a free-text query, with
//! a highlighted entry that can be moved and picked.

use api_types::{Id, Identified};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Folds text for matching: NFKD, combining marks dropped, lowercase, and
/// every run of non-alphanumeric characters collapsed into one space.
///
/// ```rust
/// assert_eq!(engine::search::normalize_key("  Café--Bar "), "cafe bar");
/// ```
pub fn normalize_key(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Exact,
    Prefix,
    WordPrefix,
    Contains,
    Secondary,
}

fn rank(query: &str, label: &str, secondary: &str) -> Option<Rank> {
    if label == query {
        Some(Rank::Exact)
    } else if label.starts_with(query) {
        Some(Rank::Prefix)
    } else if label.split(' ').any(|word| word.starts_with(query)) {
        Some(Rank::WordPrefix)
    } else if label.contains(query) {
        Some(Rank::Contains)
    } else if !secondary.is_empty() && secondary.contains(query) {
        Some(Rank::Secondary)
    } else {
        None
    }
}

type SecondaryText<T> = fn(&T) -> Option<&str>;

#[derive(Clone)]
pub struct SearchableSelect<T> {
    options: Vec<T>,
    keys: Vec<(String, String)>,
    secondary: Option<SecondaryText<T>>,
    query: String,
    /// Indexes into `options`, best match first.
    matches: Vec<usize>,
    /// Index into `matches`.
    highlighted: Option<usize>,
    selected: Option<usize>,
}

impl<T: Identified> SearchableSelect<T> {
    pub fn new(options: Vec<T>) -> Self {
        let mut select = Self {
            options: Vec::new(),
            keys: Vec::new(),
            secondary: None,
            query: String::new(),
            matches: Vec::new(),
            highlighted: None,
            selected: None,
        };
        select.set_options(options);
        select
    }

    /// Also match against a secondary text (e.g. an email), ranked after
    /// every label match.
    pub fn with_secondary(mut self, secondary: SecondaryText<T>) -> Self {
        self.secondary = Some(secondary);
        self.reindex();
        self
    }

    /// Replaces the options, keeping the query and the selection if the
    /// selected id is still present.
    pub fn set_options(&mut self, options: Vec<T>) {
        let selected_id = self.selected().map(|o| o.id().clone());
        self.options = options;
        self.selected = selected_id.and_then(|id| self.position_of(&id));
        self.reindex();
    }

    fn position_of(&self, id: &Id) -> Option<usize> {
        self.options.iter().position(|o| o.id() == id)
    }

    fn reindex(&mut self) {
        self.keys = self
            .options
            .iter()
            .map(|option| {
                let label = normalize_key(option.label().unwrap_or(option.id().as_str()));
                let secondary = self
                    .secondary
                    .and_then(|f| f(option))
                    .map(normalize_key)
                    .unwrap_or_default();
                (label, secondary)
            })
            .collect();
        self.refilter();
    }

    fn refilter(&mut self) {
        let query = normalize_key(&self.query);
        if query.is_empty() {
            self.matches = (0..self.options.len()).collect();
        } else {
            let mut ranked: Vec<(Rank, usize)> = self
                .keys
                .iter()
                .enumerate()
                .filter_map(|(idx, (label, secondary))| {
                    rank(&query, label, secondary).map(|r| (r, idx))
                })
                .collect();
            ranked.sort();
            self.matches = ranked.into_iter().map(|(_, idx)| idx).collect();
        }
        self.highlighted = (!self.matches.is_empty()).then_some(0);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// Matching options, best first.
    pub fn matches(&self) -> impl Iterator<Item = &T> + '_ {
        self.matches.iter().map(|idx| &self.options[*idx])
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn highlighted(&self) -> Option<&T> {
        self.highlighted
            .and_then(|pos| self.matches.get(pos))
            .map(|idx| &self.options[*idx])
    }

    /// Moves the highlight down, wrapping to the first match.
    pub fn move_down(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(pos) if pos + 1 < self.matches.len() => pos + 1,
            _ => 0,
        });
    }

    /// Moves the highlight up, wrapping to the last match.
    pub fn move_up(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        let last = self.matches.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => last,
            Some(pos) => pos - 1,
        });
    }

    /// Selects the highlighted option and resets the query.
    pub fn select_highlighted(&mut self) -> Option<&T> {
        let idx = self.highlighted.and_then(|pos| self.matches.get(pos).copied())?;
        self.selected = Some(idx);
        self.set_query("");
        self.options.get(idx)
    }

    /// Selects by id regardless of the current query. Returns `false` when no
    /// option has that id; the previous selection is kept in that case.
    pub fn select_by_id(&mut self, id: &Id) -> bool {
        match self.position_of(id) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|idx| self.options.get(idx))
    }

    pub fn selected_id(&self) -> Option<&Id> {
        self.selected().map(Identified::id)
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.set_query("");
    }
}

#[cfg(test)]
mod tests {
    use api_types::counterparty::Counterparty;

    use super::*;

    fn cp(id: &str, name: &str, email: Option<&str>) -> Counterparty {
        Counterparty {
            id: Id::from(id),
            name: name.to_string(),
            email: email.map(ToString::to_string),
            phone: None,
            notes: None,
        }
    }

    fn names(select: &SearchableSelect<Counterparty>) -> Vec<&str> {
        select.matches().map(|c| c.name.as_str()).collect()
    }

    fn sample() -> SearchableSelect<Counterparty> {
        SearchableSelect::new(vec![
            cp("1", "Supermarket Central", None),
            cp("2", "Café Market", Some("hello@cafe.example")),
            cp("3", "Market", None),
            cp("4", "Landlord", Some("rent@market.example")),
        ])
        .with_secondary(|c| c.email.as_deref())
    }

    #[test]
    fn normalizes_accents_case_and_separators() {
        assert_eq!(normalize_key("  CAFÉ  -  Crème "), "cafe creme");
        assert_eq!(normalize_key("___"), "");
    }

    #[test]
    fn ranks_exact_prefix_word_substring_secondary() {
        let mut select = sample();
        assert_eq!(select.match_count(), 4);

        select.set_query("market");
        assert_eq!(
            names(&select),
            vec!["Market", "Café Market", "Supermarket Central", "Landlord"]
        );

        select.set_query("cafe");
        assert_eq!(names(&select), vec!["Café Market"]);

        select.set_query("zzz");
        assert_eq!(select.match_count(), 0);
        assert!(select.highlighted().is_none());
    }

    #[test]
    fn highlight_wraps_and_selection_resets_query() {
        let mut select = sample();
        select.set_query("market");
        assert_eq!(select.highlighted().unwrap().name, "Market");

        select.move_up();
        assert_eq!(select.highlighted().unwrap().name, "Landlord");
        select.move_down();
        assert_eq!(select.highlighted().unwrap().name, "Market");
        select.move_down();

        let picked = select.select_highlighted().map(|c| c.id.clone());
        assert_eq!(picked, Some(Id::from("2")));
        assert_eq!(select.query(), "");
        assert_eq!(select.selected_id(), Some(&Id::from("2")));
    }

    #[test]
    fn selection_survives_option_reload() {
        let mut select = sample();
        assert!(select.select_by_id(&Id::from("4")));
        assert!(!select.select_by_id(&Id::from("missing")));
        assert_eq!(select.selected_id(), Some(&Id::from("4")));

        select.set_options(vec![cp("4", "Landlord", None), cp("5", "Bakery", None)]);
        assert_eq!(select.selected().unwrap().name, "Landlord");

        select.set_options(vec![cp("5", "Bakery", None)]);
        assert!(select.selected().is_none());

        select.select_by_id(&Id::from("5"));
        select.clear();
        assert!(select.selected().is_none());
    }
}
