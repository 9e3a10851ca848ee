//! Record query engine
//!
//! Conjunctive filtering (owner, temporal window on `updated_at`, type,
//! content substring, tags, ignored visibility), single-key sorting and
//! skip/take paging. The total count is computed over the filtered set
//! before paging so it is stable across pages.

use crate::db::records;
use crate::window::{self, DateFilter};
use chrono::{DateTime, NaiveDate, Utc};
use kioku_common::db::Record;
use kioku_common::{time, RecordSortField, RecordType, Result};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Row, Sqlite, SqlitePool};
use uuid::Uuid;

/// Record filter configuration.
///
/// Empty collections mean "no restriction"; a type list containing the
/// Any wildcard likewise. The content substring match is case-sensitive.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    pub date: DateFilter,
    pub record_types: Vec<RecordType>,
    pub content: String,
    pub tags: Vec<String>,
    pub sort_field: RecordSortField,
    pub sort_descending: bool,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            date: DateFilter::default(),
            record_types: Vec::new(),
            content: String::new(),
            tags: Vec::new(),
            sort_field: RecordSortField::Default,
            sort_descending: false,
        }
    }
}

/// One page of query results plus the unpaged total and the effective
/// skip/take that produced it
#[derive(Debug)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub skip: i64,
    pub take: i64,
}

impl<T> QueryPage<T> {
    pub fn new(items: Vec<T>, total_count: i64, skip: i64, take: i64) -> Self {
        Self {
            items,
            total_count,
            skip: skip.max(0),
            take: if take > 0 { take } else { total_count },
        }
    }
}

/// Read-only query engine over the records store
pub struct RecordQuery {
    db: SqlitePool,
}

impl RecordQuery {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Filtered, sorted, paged records for one user.
    ///
    /// `skip <= 0` means no offset; `take <= 0` means all remaining rows
    /// after the offset.
    pub async fn records(
        &self,
        user_id: Uuid,
        filter: &RecordFilter,
        show_ignored: bool,
        skip: i64,
        take: i64,
    ) -> Result<QueryPage<Record>> {
        let (from, to) = window::resolve(time::now(), &filter.date);
        let user_id_str = user_id.to_string();

        let restrict_types =
            !filter.record_types.is_empty() && !filter.record_types.contains(&RecordType::Any);
        let restrict_content = !filter.content.trim().is_empty();

        let mut where_sql =
            String::from("r.user_id = ? AND r.updated_at >= ? AND r.updated_at <= ?");
        if restrict_types {
            where_sql.push_str(&format!(
                " AND r.record_type IN ({})",
                placeholders(filter.record_types.len())
            ));
        }
        if restrict_content {
            // instr() is case-sensitive, unlike LIKE
            where_sql.push_str(" AND instr(r.content, ?) > 0");
        }
        if !filter.tags.is_empty() {
            where_sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM record_tags rt JOIN tags t ON t.tag_id = rt.tag_id \
                 WHERE rt.record_id = r.record_id AND t.name IN ({}))",
                placeholders(filter.tags.len())
            ));
        }
        if !show_ignored {
            where_sql.push_str(" AND r.ignored = 0");
        }

        // Total over the filtered set, before skip/take
        let count_sql = format!("SELECT COUNT(*) FROM records r WHERE {where_sql}");
        let count_row = bind_filter_values(
            sqlx::query(&count_sql),
            &user_id_str,
            from,
            to,
            filter,
            restrict_types,
            restrict_content,
        )
        .fetch_one(&self.db)
        .await?;
        let total_count: i64 = count_row.get(0);

        let order_sql = match sort_key(filter.sort_field) {
            Some(key) => format!(
                " ORDER BY {key} {}",
                if filter.sort_descending { "DESC" } else { "ASC" }
            ),
            None => String::new(),
        };

        let page_sql = format!(
            "SELECT r.record_id, r.user_id, r.content, r.record_type, r.score, r.ignored, \
             r.created_at, r.updated_at \
             FROM records r WHERE {where_sql}{order_sql} LIMIT ? OFFSET ?"
        );
        // LIMIT -1 is SQLite for "unbounded"
        let limit = if take > 0 { take } else { -1 };
        let offset = skip.max(0);

        let rows = bind_filter_values(
            sqlx::query(&page_sql),
            &user_id_str,
            from,
            to,
            filter,
            restrict_types,
            restrict_content,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        let items = rows
            .iter()
            .map(records::record_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(QueryPage::new(items, total_count, skip, take))
    }

    /// Fixed-shape "top records" query: same owner/type/window/ignored
    /// filters, always ordered score descending then `updated_at`
    /// descending, truncated to `count`.
    pub async fn top_records(
        &self,
        user_id: Uuid,
        count: i64,
        record_type: RecordType,
        from: NaiveDate,
        to: NaiveDate,
        show_ignored: bool,
    ) -> Result<Vec<Record>> {
        let from = time::start_of_day(from);
        let to = time::end_of_day(to);

        let mut sql = String::from(
            "SELECT record_id, user_id, content, record_type, score, ignored, created_at, updated_at \
             FROM records WHERE user_id = ? AND updated_at >= ? AND updated_at <= ?",
        );
        if record_type != RecordType::Any {
            sql.push_str(" AND record_type = ?");
        }
        if !show_ignored {
            sql.push_str(" AND ignored = 0");
        }
        sql.push_str(" ORDER BY score DESC, updated_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(from)
            .bind(to);
        if record_type != RecordType::Any {
            query = query.bind(record_type.code());
        }
        query = query.bind(count);

        let rows = query.fetch_all(&self.db).await?;
        rows.iter().map(records::record_from_row).collect()
    }
}

/// Bind the filter values in the same order the WHERE clause was assembled
fn bind_filter_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    user_id: &'q str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    filter: &'q RecordFilter,
    restrict_types: bool,
    restrict_content: bool,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query = query.bind(user_id).bind(from).bind(to);
    if restrict_types {
        for record_type in &filter.record_types {
            query = query.bind(record_type.code());
        }
    }
    if restrict_content {
        query = query.bind(filter.content.as_str());
    }
    for tag in &filter.tags {
        query = query.bind(tag.as_str());
    }
    query
}

fn sort_key(field: RecordSortField) -> Option<&'static str> {
    match field {
        RecordSortField::Default => None,
        RecordSortField::Content => Some("r.content"),
        RecordSortField::Type => Some("r.record_type"),
        RecordSortField::Created => Some("r.created_at"),
        RecordSortField::Updated => Some("r.updated_at"),
        RecordSortField::Score => Some("r.score"),
        RecordSortField::Hits => {
            Some("(SELECT COUNT(*) FROM record_hits h WHERE h.record_id = r.record_id)")
        }
        RecordSortField::Tags => {
            Some("(SELECT COUNT(*) FROM record_tags rt2 WHERE rt2.record_id = r.record_id)")
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_page_normalizes_skip_and_take() {
        let page = QueryPage::new(vec![1, 2, 3], 10, -5, 0);
        assert_eq!(page.skip, 0);
        assert_eq!(page.take, 10);

        let page = QueryPage::new(vec![1], 10, 4, 2);
        assert_eq!(page.skip, 4);
        assert_eq!(page.take, 2);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
