use serde::Deserialize;

// A missing or unparsable page parameter falls back to the first page.
#[derive(Deserialize, Default)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_numeric_page() {
        let query = PageQuery {
            page: Some("3".to_owned()),
        };
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn defaults_to_the_first_page() {
        assert_eq!(PageQuery::default().page(), 1);

        let query = PageQuery {
            page: Some("most".to_owned()),
        };
        assert_eq!(query.page(), 1);
    }
}
