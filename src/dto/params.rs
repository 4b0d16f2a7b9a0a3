use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn page(page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: None,
        }
    }

    /// Clamped copy that is safe to put on the wire.
    pub fn normalize(&self) -> Self {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalonSearchQuery {
    pub search: String,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_out_of_range_values() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        }
        .normalize();
        assert_eq!(p.page, Some(1));
        assert_eq!(p.per_page, Some(100));
        assert_eq!(Pagination::default().normalize().per_page, Some(20));
    }
}
