//! Natural-language text helpers.
//!
//! Everything here works on plain strings and knows nothing about the schema,
//! so each transform can be tested on its own.

use std::sync::LazyLock;

use regex::Regex;

static DISCRIMINATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"depending on `(\w+)`:").expect("static regex must compile"));
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\n]+)""#).expect("static regex must compile"));

/// Converts `snake_case`, `kebab-case` or dotted names to `PascalCase`.
///
/// ```
/// use api_decl_gen::text::pascal_case;
///
/// assert_eq!(pascal_case("on_player_joined_game"), "OnPlayerJoinedGame");
/// assert_eq!(pascal_case("get_inventory"), "GetInventory");
/// assert_eq!(pascal_case("item-with-tags"), "ItemWithTags");
/// ```
pub fn pascal_case(name: &str) -> String {
    name.split(['_', '-', ' ', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Extracts the discriminator field from a variant description.
///
/// The field is written as ``depending on `field`:``. Descriptions naming no
/// field, or more than one distinct field, have no discriminator.
pub fn discriminator_field(description: &str) -> Option<String> {
    let mut found: Option<&str> = None;
    for caps in DISCRIMINATOR_RE.captures_iter(description) {
        let field = caps.get(1)?.as_str();
        match found {
            None => found = Some(field),
            Some(existing) if existing == field => {}
            Some(_) => return None,
        }
    }
    found.map(String::from)
}

/// Double-quoted tokens in a description, deduplicated in order of appearance.
pub fn quoted_literals(description: &str) -> Vec<String> {
    let mut literals: Vec<String> = Vec::new();
    for caps in QUOTED_RE.captures_iter(description) {
        if let Some(token) = caps.get(1) {
            let token = token.as_str().to_string();
            if !literals.contains(&token) {
                literals.push(token);
            }
        }
    }
    literals
}

/// The pieces of one doc comment, with links already rewritten.
#[derive(Debug, Clone, Default)]
pub struct DocParts {
    pub description: String,
    pub notes: Vec<String>,
    pub examples: Vec<String>,
    pub see: Option<String>,
}

impl DocParts {
    /// Joins the pieces into doc comment text, or `None` when all are empty.
    ///
    /// ```
    /// use api_decl_gen::text::DocParts;
    ///
    /// let doc = DocParts {
    ///     description: "The player's character.".into(),
    ///     notes: vec!["Read only in multiplayer.".into()],
    ///     examples: Vec::new(),
    ///     see: Some("https://lua-api.factorio.com/latest/LuaPlayer.html".into()),
    /// };
    /// assert_eq!(
    ///     doc.render().unwrap(),
    ///     "The player's character.\n\n**Note:** Read only in multiplayer.\n\n@see https://lua-api.factorio.com/latest/LuaPlayer.html"
    /// );
    /// assert!(DocParts::default().render().is_none());
    /// ```
    pub fn render(&self) -> Option<String> {
        let mut blocks = Vec::new();
        let description = self.description.trim();
        if !description.is_empty() {
            blocks.push(description.to_string());
        }
        for note in &self.notes {
            let note = note.trim();
            if !note.is_empty() {
                blocks.push(format!("**Note:** {note}"));
            }
        }
        for example in &self.examples {
            let example = example.trim();
            if !example.is_empty() {
                blocks.push(format!("@example\n{example}"));
            }
        }
        if let Some(url) = &self.see {
            blocks.push(format!("@see {url}"));
        }

        if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n\n"))
        }
    }
}
