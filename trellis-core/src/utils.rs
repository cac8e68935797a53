//! Utility functions shared by the router crates
//!
//! Naming conventions used to turn Rust type paths into URL path fragments.

/// Naming convention utilities for action types and module paths
pub mod naming {
    /// Converts a PascalCase type name to camelCase.
    ///
    /// This is the default action naming strategy: `BooAction` with the
    /// suffix removed becomes `boo`, `UserProfile` becomes `userProfile`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::utils::naming::to_camel_case;
    ///
    /// assert_eq!(to_camel_case("UserService"), "userService");
    /// assert_eq!(to_camel_case("A"), "a");
    /// assert_eq!(to_camel_case(""), "");
    /// ```
    pub fn to_camel_case(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => {
                let mut result = String::with_capacity(s.len());
                result.extend(first.to_lowercase());
                result.push_str(chars.as_str());
                result
            }
        }
    }

    /// Removes `suffix` from the end of `name` unless that would leave nothing.
    ///
    /// ```
    /// use trellis_core::utils::naming::strip_type_suffix;
    ///
    /// assert_eq!(strip_type_suffix("BooAction", "Action"), "Boo");
    /// assert_eq!(strip_type_suffix("Action", "Action"), "Action");
    /// assert_eq!(strip_type_suffix("Boo", "Action"), "Boo");
    /// ```
    pub fn strip_type_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
        match name.strip_suffix(suffix) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        }
    }

    /// Splits a fully qualified type path into `(module path, type name)`.
    ///
    /// Generic arguments are dropped, so `app::web::BooAction<T>` yields
    /// `("app::web", "BooAction")`.
    ///
    /// ```
    /// use trellis_core::utils::naming::split_type_path;
    ///
    /// assert_eq!(split_type_path("app::web::BooAction"), ("app::web", "BooAction"));
    /// assert_eq!(split_type_path("BooAction"), ("", "BooAction"));
    /// ```
    pub fn split_type_path(type_path: &str) -> (&str, &str) {
        let base = type_path.split('<').next().unwrap_or(type_path);
        match base.rsplit_once("::") {
            Some((module, name)) => (module, name),
            None => ("", base),
        }
    }

    /// Splits a module path on `::` (or `.` for configuration written in
    /// dotted form) into its non-empty segments.
    ///
    /// ```
    /// use trellis_core::utils::naming::module_segments;
    ///
    /// assert_eq!(module_segments("app::web::admin"), vec!["app", "web", "admin"]);
    /// assert_eq!(module_segments("app.web"), vec!["app", "web"]);
    /// assert!(module_segments("").is_empty());
    /// ```
    pub fn module_segments(module_path: &str) -> Vec<&str> {
        module_path
            .split("::")
            .flat_map(|part| part.split('.'))
            .filter(|part| !part.is_empty())
            .collect()
    }
}
