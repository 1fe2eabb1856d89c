use std::cmp::Reverse;
use std::str::FromStr;

use crate::errors::ModelError;
use crate::post::Post;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    fn key(self, post: &Post) -> String {
        match self {
            SortField::Title => post.title.to_lowercase(),
            SortField::Content => post.content.to_lowercase(),
        }
    }
}

impl FromStr for SortField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            _ => Err(ModelError::Validation(format!(
                "Invalid sort field '{s}'. Use 'title' or 'content'."
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ModelError::Validation(format!(
                "Invalid sort direction '{s}'. Use 'asc' or 'desc'."
            ))),
        }
    }
}

/// Ordering requested by the `sort` / `direction` query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// `Ok(None)` when no sort was requested. `direction` is checked even then.
    pub fn parse(sort: Option<&str>, direction: Option<&str>) -> Result<Option<Self>, ModelError> {
        let direction = match direction.filter(|d| !d.trim().is_empty()) {
            Some(d) => d.parse()?,
            None => SortDirection::default(),
        };
        match sort.filter(|s| !s.trim().is_empty()) {
            Some(s) => Ok(Some(Self { field: s.parse()?, direction })),
            None => Ok(None),
        }
    }

    /// Stable sort on the lowercased field; ties keep their incoming order.
    pub fn apply(&self, posts: &mut [Post]) {
        let field = self.field;
        match self.direction {
            SortDirection::Asc => posts.sort_by_cached_key(|p| field.key(p)),
            SortDirection::Desc => posts.sort_by_cached_key(|p| Reverse(field.key(p))),
        }
    }
}

/// Case-insensitive substring filters from the search query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    title: Option<String>,
    content: Option<String>,
}

impl SearchFilter {
    pub fn new(title: Option<&str>, content: Option<&str>) -> Self {
        let lower = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_lowercase);
        Self { title: lower(title), content: lower(content) }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let contains = |needle: &Option<String>, hay: &str| match needle {
            Some(n) => hay.to_lowercase().contains(n.as_str()),
            None => true,
        };
        contains(&self.title, &post.title) && contains(&self.content, &post.content)
    }
}
