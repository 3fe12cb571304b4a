//! Paths served by the review API, relative to [`ApiData::api_url`](crate::api::ApiData).
//!
//! ```rust
//! use review_client::api::{Collection, Route, SubCollection};
//!
//! let votes = Route::collection(Collection::Movies)
//!     .id(3)
//!     .sub(SubCollection::Ratings)
//!     .id(12)
//!     .sub(SubCollection::Votes)
//!     .param("id")
//!     .build();
//! assert_eq!(votes, "/movies/3/ratings/12/votes/{id}");
//! ```

use std::fmt::{self, Display};

pub const PING: &str = "/auth/ping";
pub const REFRESH_ACCESS_TOKEN: &str = "/auth/refresh_access_token";
pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const LOGOUT: &str = "/auth/logout";

/// Top-level collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Movies,
    Directors,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Movies => "movies",
            Collection::Directors => "directors",
            Collection::Users => "users",
        }
    }
}

/// Collections nested under a parent resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCollection {
    Ratings,
    Votes,
}

impl SubCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubCollection::Ratings => "ratings",
            SubCollection::Votes => "votes",
        }
    }
}

/// Builder for `/{collection}[/{id}][/{sub}[/{sub-id}]]` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
}

impl Route {
    pub fn collection(collection: Collection) -> Self {
        Self {
            path: format!("/{}", collection.as_str()),
        }
    }

    /// Appends a concrete id segment.
    pub fn id(mut self, id: impl Display) -> Self {
        self.path.push('/');
        self.path.push_str(&id.to_string());
        self
    }

    /// Appends a `{name}` segment to be filled at trigger time.
    pub fn param(self, name: &str) -> Self {
        self.id(placeholder(name))
    }

    pub fn sub(mut self, sub: SubCollection) -> Self {
        self.path.push('/');
        self.path.push_str(sub.as_str());
        self
    }

    pub fn build(self) -> String {
        self.path
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// `{name}`, the placeholder form understood by [`resolve`](crate::url_template::resolve).
pub fn placeholder(name: &str) -> String {
    format!("{{{name}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_and_item_paths() {
        assert_eq!(Route::collection(Collection::Directors).build(), "/directors");
        assert_eq!(Route::collection(Collection::Users).id(42).build(), "/users/42");
        assert_eq!(
            Route::collection(Collection::Movies).id(7).sub(SubCollection::Ratings).to_string(),
            "/movies/7/ratings"
        );
    }

    #[test]
    fn placeholders_use_brace_syntax() {
        assert_eq!(placeholder("id"), "{id}");
        assert_eq!(Route::collection(Collection::Movies).param("id").build(), "/movies/{id}");
    }
}
