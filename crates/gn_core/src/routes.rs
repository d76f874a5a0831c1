use std::fmt;

use serde::Serialize;

/// The named category routes of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "category", rename_all = "camelCase")]
pub enum Route {
    Home,
    News,
    Business,
    Sports,
    WorldNews,
    Articles(String),
}

impl Route {
    /// Routes shown in the navigation bar, in order.
    pub const NAVIGATION: [Route; 5] = [
        Route::Home,
        Route::News,
        Route::Business,
        Route::Sports,
        Route::WorldNews,
    ];

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "news" => Some(Route::News),
            "business" => Some(Route::Business),
            "sports" => Some(Route::Sports),
            "worldNews" => Some(Route::WorldNews),
            _ => trimmed
                .strip_prefix("articles/")
                .filter(|category| !category.is_empty() && !category.contains('/'))
                .map(|category| Route::Articles(category.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::News => "/news".to_string(),
            Route::Business => "/business".to_string(),
            Route::Sports => "/sports".to_string(),
            Route::WorldNews => "/worldNews".to_string(),
            Route::Articles(category) => format!("/articles/{}", category),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Route::Home => "Home",
            Route::News => "News",
            Route::Business => "Business",
            Route::Sports => "Sports",
            Route::WorldNews => "World News",
            Route::Articles(category) => category,
        }
    }

    /// Section filter applied when this route is shown.
    pub fn section(&self) -> Option<&str> {
        match self {
            Route::Home => None,
            Route::News => Some("top"),
            Route::Business => Some("business"),
            Route::Sports => Some("sports"),
            Route::WorldNews => Some("world"),
            Route::Articles(category) => Some(category),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("news"), Some(Route::News));
        assert_eq!(Route::parse("/worldNews"), Some(Route::WorldNews));
        assert_eq!(
            Route::parse("/articles/health"),
            Some(Route::Articles("health".into()))
        );
        assert_eq!(Route::parse("/articles/"), None);
        assert_eq!(Route::parse("/articles/a/b"), None);
        assert_eq!(Route::parse("/weather"), None);
    }

    #[test]
    fn test_path_round_trips() {
        for route in Route::NAVIGATION.iter().cloned().chain([Route::Articles("tech".into())]) {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_route_sections() {
        assert_eq!(Route::Home.section(), None);
        assert_eq!(Route::Sports.section(), Some("sports"));
        assert_eq!(Route::Articles("health".into()).section(), Some("health"));
    }
}
