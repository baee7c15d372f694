use super::models::{User, UserRole, UserStatus};
use crate::http::ApiResponder;
use serde::Serialize;
use std::{cmp::Ordering, num::IntErrorKind, str::FromStr};

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const DEFAULT_MAX_PAGE_LIMIT: usize = 100;

/// Raw listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default)]
pub struct UserQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
    /// A value that names no variant, nothing can match it.
    Unmatched,
}

impl<T: FromStr + PartialEq> Filter<T> {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("All") => Self::All,
            Some(s) => s.parse().map_or(Self::Unmatched, Self::Only),
        }
    }

    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == value,
            Self::Unmatched => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Username,
    Email,
    Role,
    Status,
    CreatedAt,
}

impl SortField {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("username") => Self::Username,
            Some("email") => Self::Email,
            Some("role") => Self::Role,
            Some("status") => Self::Status,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A normalized listing query: filter, then sort, then paginate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub page: usize,
    pub limit: usize,
    pub search: String,
    pub status: Filter<UserStatus>,
    pub role: Filter<UserRole>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: String::new(),
            status: Filter::All,
            role: Filter::All,
            sort_field: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Numbers too large for `usize` saturate instead of being treated as garbage.
fn parse_positive(raw: Option<&str>) -> Option<usize> {
    let parsed = match raw?.trim().parse::<usize>() {
        Ok(v) => v,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
        Err(_) => return None,
    };

    (parsed > 0).then_some(parsed)
}

impl FromIterator<(String, String)> for UserQueryParams {
    /// Repeated keys keep their first value, unknown keys are ignored.
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::default();

        for (key, value) in iter {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "status" => &mut params.status,
                "role" => &mut params.role,
                "sortField" => &mut params.sort_field,
                "sortOrder" => &mut params.sort_order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }
}

impl UserQueryParams {
    pub fn into_query(self, max_limit: usize) -> UserQuery {
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(max_limit.max(1));

        UserQuery {
            page: parse_positive(self.page.as_deref()).unwrap_or(1),
            limit,
            search: self.search.unwrap_or_default(),
            status: Filter::parse(self.status.as_deref()),
            role: Filter::parse(self.role.as_deref()),
            sort_field: SortField::parse(self.sort_field.as_deref()),
            sort_order: match self.sort_order.as_deref() {
                Some("asc") => SortOrder::Asc,
                _ => SortOrder::Desc,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl ApiResponder for UserPage {
    fn unit() -> &'static str {
        "user"
    }
    fn article() -> &'static str {
        "A"
    }

    fn message(&self) -> String {
        let unit = Self::unit();

        match self.users.len() {
            0 => format!("No {unit} was returned"),
            1 => format!("1 {unit} was returned"),
            n => format!("{n} {unit}s were returned"),
        }
    }
}

/// Case-insensitive ordering first, then lowercase before uppercase, the way
/// a locale collator ranks "alice" next to "Alice" rather than after "Zoe".
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        if !self.status.matches(&user.status) || !self.role.matches(&user.role) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        [user.username.as_str(), user.email.as_str(), user.role.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let ord = match self.sort_field {
            SortField::Username => locale_cmp(&a.username, &b.username),
            SortField::Email => locale_cmp(&a.email, &b.email),
            SortField::Role => locale_cmp(a.role.as_str(), b.role.as_str()),
            SortField::Status => locale_cmp(a.status.as_str(), b.status.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };

        match self.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    /// Runs the query over the whole collection. The sort is stable, equal
    /// keys keep collection order.
    pub fn run(&self, users: &[User]) -> UserPage {
        let mut matched: Vec<&User> = users.iter().filter(|u| self.matches(u)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let total = matched.len();
        let start = self.page.saturating_sub(1).saturating_mul(self.limit);

        let users = matched
            .into_iter()
            .skip(start)
            .take(self.limit)
            .cloned()
            .collect();

        UserPage {
            users,
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total.div_ceil(self.limit.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn user(
        id: &str,
        username: &str,
        role: UserRole,
        status: UserStatus,
        at: DateTime<Utc>,
    ) -> User {
        User {
            id: id.into(),
            username: username.into(),
            email: format!("{username}@druckland.de"),
            phone_number: None,
            role,
            status,
            created_at: at,
            updated_at: at,
            password: String::new(),
            profile_picture: None,
            order_count: 0,
            review_count: 0,
        }
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn alice_and_bob() -> Vec<User> {
        vec![
            user("1", "alice", UserRole::Admin, UserStatus::Active, t(1)),
            user("2", "bob", UserRole::Customer, UserStatus::Inactive, t(2)),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> UserQueryParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn names(page: &UserPage) -> Vec<&str> {
        page.users.iter().map(|u| u.username.as_str()).collect()
    }

    #[test]
    fn test_status_filter() {
        let query = params(&[("status", "Active")]).into_query(100);
        let page = query.run(&alice_and_bob());

        assert_eq!(names(&page), ["alice"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_created_at_desc() {
        let query = params(&[("sortField", "createdAt"), ("sortOrder", "desc")]).into_query(100);
        let page = query.run(&alice_and_bob());

        assert_eq!(names(&page), ["bob", "alice"]);
    }

    #[test]
    fn test_defaults() {
        let query = UserQueryParams::default().into_query(100);
        assert_eq!(query, UserQuery::default());

        let query = params(&[("page", "abc"), ("limit", "0")]).into_query(100);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_limit_is_clamped() {
        let query = params(&[("limit", "5000")]).into_query(100);
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        let query = params(&[("sortField", "password"), ("sortOrder", "asc")]).into_query(100);

        assert_eq!(query.sort_field, SortField::CreatedAt);
        assert_eq!(names(&query.run(&alice_and_bob())), ["alice", "bob"]);
    }

    #[test]
    fn test_filters_are_case_sensitive() {
        let users = alice_and_bob();

        let query = params(&[("status", "active")]).into_query(100);
        assert_eq!(query.status, Filter::Unmatched);
        assert_eq!(query.run(&users).total, 0);

        let query = params(&[("role", "All"), ("status", "All")]).into_query(100);
        assert_eq!(query.run(&users).total, 2);
    }

    #[test]
    fn test_search_matches_username_email_and_role() {
        let users = vec![
            user("1", "Alice", UserRole::Admin, UserStatus::Active, t(1)),
            user("2", "bob", UserRole::Customer, UserStatus::Active, t(2)),
            user("3", "carol", UserRole::Customer, UserStatus::Banned, t(3)),
        ];

        let page = params(&[("search", "ALI")]).into_query(100).run(&users);
        assert_eq!(names(&page), ["Alice"]);

        let page = params(&[("search", "custom"), ("sortOrder", "asc")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["bob", "carol"]);

        let page = params(&[("search", "druckland.de")])
            .into_query(100)
            .run(&users);
        assert_eq!(page.total, 3);

        let page = params(&[("search", "custom"), ("status", "Banned")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["carol"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let users = alice_and_bob();
        let query = params(&[("search", "a"), ("role", "Admin")]).into_query(100);

        let once = query.run(&users).users;
        let twice = query.run(&once).users;

        let ids = |v: &[User]| v.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_username_sort_is_case_insensitive() {
        let users = vec![
            user("1", "zoe", UserRole::Customer, UserStatus::Active, t(1)),
            user("2", "Bob", UserRole::Customer, UserStatus::Active, t(2)),
            user("3", "alice", UserRole::Customer, UserStatus::Active, t(3)),
        ];

        let page = params(&[("sortField", "username"), ("sortOrder", "asc")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["alice", "Bob", "zoe"]);
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let users = vec![
            user("1", "a", UserRole::Customer, UserStatus::Active, t(1)),
            user("2", "b", UserRole::Admin, UserStatus::Active, t(2)),
            user("3", "c", UserRole::Customer, UserStatus::Active, t(3)),
        ];

        let page = params(&[("sortField", "role"), ("sortOrder", "desc")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["a", "c", "b"]);
    }

    #[test]
    fn test_pagination_bounds() {
        let users: Vec<User> = (0..23)
            .map(|i| {
                user(
                    &i.to_string(),
                    &format!("user{i:02}"),
                    UserRole::Customer,
                    UserStatus::Active,
                    t(i),
                )
            })
            .collect();

        for limit in [1_usize, 5, 10, 23, 50] {
            for page in 1..=6_usize {
                let query = UserQuery {
                    page,
                    limit,
                    ..Default::default()
                };
                let res = query.run(&users);

                let expected = users.len().saturating_sub((page - 1) * limit).min(limit);
                assert_eq!(res.users.len(), expected, "page {page} limit {limit}");
                assert_eq!(res.total, users.len());
                assert_eq!(res.total_pages, users.len().div_ceil(limit));
                assert_eq!(res.page, page);
                assert_eq!(res.limit, limit);
            }
        }
    }

    #[test]
    fn test_page_contents() {
        let users: Vec<User> = (0..5)
            .map(|i| {
                user(
                    &i.to_string(),
                    &format!("u{i}"),
                    UserRole::Customer,
                    UserStatus::Active,
                    t(i),
                )
            })
            .collect();

        let page = params(&[("page", "2"), ("limit", "2"), ("sortOrder", "asc")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["u2", "u3"]);

        let page = params(&[("page", "9"), ("limit", "2")]).into_query(100).run(&users);
        assert!(page.users.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let query = params(&[
            ("status", "Active"),
            ("status", "Banned"),
            ("sortOrder", "asc"),
            ("sortOrder", "desc"),
            ("unknown", "x"),
        ])
        .into_query(100);

        assert_eq!(query.status, Filter::Only(UserStatus::Active));
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_overflowing_page_is_out_of_range() {
        let query = params(&[
            ("page", "99999999999999999999999"),
            ("limit", "99999999999999999999"),
        ])
        .into_query(100);

        assert_eq!(query.page, usize::MAX);
        assert_eq!(query.limit, 100);

        let page = query.run(&alice_and_bob());
        assert!(page.users.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);

        let query = params(&[("page", "-3")]).into_query(100);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_lowercase_sorts_before_uppercase_on_ties() {
        let users = vec![
            user("1", "Anna", UserRole::Customer, UserStatus::Active, t(1)),
            user("2", "anna", UserRole::Customer, UserStatus::Active, t(2)),
        ];

        let page = params(&[("sortField", "username"), ("sortOrder", "asc")])
            .into_query(100)
            .run(&users);
        assert_eq!(names(&page), ["anna", "Anna"]);
    }
}
