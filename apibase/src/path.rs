use std::borrow::Cow;

/// Anything that can be used as the path part of an API URL.
///
/// A value whose string form is empty, along with `None`, `()`, and the integer zero, stands for
/// the root path `/`.
pub trait PathArg {
    fn to_path_string(&self) -> Cow<'_, str>;
}

impl PathArg for str {
    fn to_path_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl PathArg for String {
    fn to_path_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl PathArg for Cow<'_, str> {
    fn to_path_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

impl PathArg for () {
    fn to_path_string(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

impl<T: PathArg + ?Sized> PathArg for &T {
    fn to_path_string(&self) -> Cow<'_, str> {
        (**self).to_path_string()
    }
}

impl<T: PathArg> PathArg for Option<T> {
    fn to_path_string(&self) -> Cow<'_, str> {
        match self {
            Some(p) => p.to_path_string(),
            None => Cow::Borrowed(""),
        }
    }
}

// Zero is treated like an empty path, so it maps to `/` rather than `/0`.
macro_rules! integer_path_arg {
    ($($t:ty),+ $(,)?) => {
        $(
            impl PathArg for $t {
                fn to_path_string(&self) -> Cow<'_, str> {
                    if *self == 0 {
                        Cow::Borrowed("")
                    } else {
                        Cow::Owned(self.to_string())
                    }
                }
            }
        )+
    };
}

integer_path_arg!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Joins `base` and `path` with exactly one `/` between them.
///
/// An empty `path` becomes `/`. Only the join point is normalized, so a `base` that already ends
/// in `/` followed by a `path` that starts with one still produces `//`.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };

    let mut url = String::with_capacity(base.len() + path.len() + 1);
    url.push_str(base);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "http://127.0.0.1:9000";

    #[rstest]
    #[case::empty("", "http://127.0.0.1:9000/")]
    #[case::root("/", "http://127.0.0.1:9000/")]
    #[case::leading_slash("/users", "http://127.0.0.1:9000/users")]
    #[case::no_leading_slash("users", "http://127.0.0.1:9000/users")]
    #[case::nested("/users/42/profile", "http://127.0.0.1:9000/users/42/profile")]
    #[case::nested_without_slash("users/42/profile", "http://127.0.0.1:9000/users/42/profile")]
    #[case::query("search?q=a/b", "http://127.0.0.1:9000/search?q=a/b")]
    #[case::doubled_in_path("//users", "http://127.0.0.1:9000//users")]
    #[case::trailing_slash_kept("/users/", "http://127.0.0.1:9000/users/")]
    fn join_normalizes_the_join_point(#[case] path: &str, #[case] expect: &str) {
        assert_eq!(join(BASE, path), expect);
    }

    #[test]
    fn join_leaves_base_alone() {
        assert_eq!(
            join("http://example.com/", "/users"),
            "http://example.com//users"
        );
        assert_eq!(join("http://example.com/", "users"), "http://example.com//users");
        assert_eq!(join("", "users"), "/users");
    }

    #[rstest]
    #[case::str_slice(&"users", "users")]
    #[case::unit(&(), "")]
    #[case::none(&None::<&str>, "")]
    #[case::some(&Some("users"), "users")]
    #[case::number(&42_u32, "42")]
    #[case::zero(&0_u32, "")]
    #[case::signed_zero(&0_i64, "")]
    #[case::negative(&-1_i64, "-1")]
    fn coerces_to_string(#[case] arg: &dyn PathArg, #[case] expect: &str) {
        assert_eq!(arg.to_path_string(), expect);
    }

    #[test]
    fn owned_strings() {
        let s = String::from("/a");
        assert_eq!(s.to_path_string(), "/a");
        assert_eq!((&s).to_path_string(), "/a");
        assert_eq!(Cow::Borrowed("b").to_path_string(), "b");
        assert_eq!(Some(String::new()).to_path_string(), "");
    }
}
