use crate::db::models::{
    ClassificationEntry, SIMILAR_GROUP_TOKEN_LEN, UnifiedRecord, decode_similar_groups,
};
use crate::db::{CandidateSet, OrderKey, RecordId, Store};
use crate::error::Result;
use crate::query::{Field, ParsedQuery};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Bound parameters per statement, kept under SQLite's host-parameter ceiling.
const BIND_CHUNK: usize = 500;

/// Separators emitted by the server-side child aggregation. Control
/// characters never occur in register text.
const UNIT_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Header query for domestic records: one row per application, with the
/// precedence-chosen display text and the applicant name resolved through
/// the party chain (master name, else the most frequent partial spelling,
/// else the raw code).
const DOMESTIC_HEADER_SQL: &str =
    "SELECT a.app_num, a.filing_date, a.reg_date, a.reg_num, \
     dt.text AS display_text, pa.name AS applicant_name, rh.name AS rights_holder_name, \
     EXISTS(SELECT 1 FROM tm_images i WHERE i.app_num = a.app_num) AS has_image \
     FROM tm_applications a \
     LEFT JOIN (SELECT app_num, text, ROW_NUMBER() OVER (PARTITION BY app_num \
         ORDER BY CASE source WHEN 'standard' THEN 0 WHEN 'indicated' THEN 1 ELSE 2 END, seq) AS rn \
         FROM tm_display_texts) dt ON dt.app_num = a.app_num AND dt.rn = 1 \
     LEFT JOIN (SELECT l.app_num, COALESCE(m.name, p.name, l.code) AS name, \
         ROW_NUMBER() OVER (PARTITION BY l.app_num ORDER BY l.seq) AS rn \
         FROM tm_applicants l \
         LEFT JOIN party_master m ON m.code = l.code \
         LEFT JOIN (SELECT code, name, ROW_NUMBER() OVER (PARTITION BY code \
             ORDER BY appearance_count DESC, name) AS prn \
             FROM party_partial) p ON p.code = l.code AND p.prn = 1) pa \
         ON pa.app_num = a.app_num AND pa.rn = 1 \
     LEFT JOIN (SELECT app_num, name, ROW_NUMBER() OVER (PARTITION BY app_num ORDER BY seq) AS rn \
         FROM tm_rights_holders) rh ON rh.app_num = a.app_num AND rh.rn = 1 \
     WHERE a.app_num IN ";

const INTERNATIONAL_HEADER_SQL: &str =
    "SELECT r.intl_reg_num, r.filing_date, r.reg_date, \
     dt.text AS display_text, h.name AS holder_name, \
     EXISTS(SELECT 1 FROM intl_images i WHERE i.intl_reg_num = r.intl_reg_num) AS has_image \
     FROM intl_registrations r \
     LEFT JOIN (SELECT intl_reg_num, text, \
         ROW_NUMBER() OVER (PARTITION BY intl_reg_num ORDER BY seq) AS rn \
         FROM intl_display_texts) dt ON dt.intl_reg_num = r.intl_reg_num AND dt.rn = 1 \
     LEFT JOIN (SELECT intl_reg_num, name, \
         ROW_NUMBER() OVER (PARTITION BY intl_reg_num ORDER BY seq) AS rn \
         FROM intl_holders) h ON h.intl_reg_num = r.intl_reg_num AND h.rn = 1 \
     WHERE r.intl_reg_num IN ";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn resolve(&self, field: Field, query: &ParsedQuery) -> Result<CandidateSet> {
        if query.wildcard_all {
            return self.full_corpus(field).await;
        }
        match field {
            Field::ApplicationNumber => {
                let ids = self
                    .fetch_identifiers(
                        "SELECT app_num FROM tm_applications WHERE app_num IN ",
                        &query.terms,
                    )
                    .await?;
                Ok(ids.into_iter().map(RecordId::Domestic).collect())
            }
            Field::RegistrationNumber => {
                let ids = self
                    .fetch_identifiers(
                        "SELECT app_num FROM tm_applications WHERE reg_num IN ",
                        &query.terms,
                    )
                    .await?;
                Ok(ids.into_iter().map(RecordId::Domestic).collect())
            }
            Field::InternationalRegistrationNumber => {
                let ids = self
                    .fetch_identifiers(
                        "SELECT intl_reg_num FROM intl_registrations WHERE intl_reg_num IN ",
                        &query.terms,
                    )
                    .await?;
                Ok(ids.into_iter().map(RecordId::International).collect())
            }
            Field::DisplayText => {
                self.resolve_text_field("tm_display_texts", "intl_display_texts", "canonical", query)
                    .await
            }
            Field::GoodsServicesText => {
                self.resolve_text_field("tm_classes", "intl_classes", "canonical_goods", query)
                    .await
            }
            Field::Phonetic => self.resolve_phonetic(query).await,
            Field::PhoneticExact => self.resolve_phonetic_exact(&query.terms).await,
            Field::ClassificationCode => self.resolve_classification(&query.terms).await,
            Field::SimilarGroupCode => self.resolve_similar_group(&query.terms).await,
            Field::ApplicantName => self.resolve_applicant_name(query).await,
        }
    }

    async fn full_corpus(&self, field: Field) -> Result<CandidateSet> {
        let mut candidates = CandidateSet::new();
        if field.covers_domestic() {
            let ids: Vec<String> = sqlx::query_scalar("SELECT app_num FROM tm_applications")
                .fetch_all(&self.pool)
                .await?;
            candidates.extend(ids.into_iter().map(RecordId::Domestic));
        }
        if field.covers_international() {
            let ids: Vec<String> = sqlx::query_scalar("SELECT intl_reg_num FROM intl_registrations")
                .fetch_all(&self.pool)
                .await?;
            candidates.extend(ids.into_iter().map(RecordId::International));
        }
        Ok(candidates)
    }

    async fn order_keys(&self, candidates: &CandidateSet) -> Result<Vec<OrderKey>> {
        let mut domestic = Vec::new();
        let mut international = Vec::new();
        for id in candidates {
            match id {
                RecordId::Domestic(num) => domestic.push(num.clone()),
                RecordId::International(num) => international.push(num.clone()),
            }
        }

        let mut keys = Vec::with_capacity(candidates.len());
        for chunk in domestic.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(
                "SELECT app_num, reg_date, filing_date FROM tm_applications WHERE app_num IN ",
            );
            push_in_list(&mut qb, chunk);
            let rows: Vec<(String, Option<NaiveDate>, Option<NaiveDate>)> =
                qb.build_query_as().fetch_all(&self.pool).await?;
            keys.extend(rows.into_iter().map(|(num, reg_date, filing_date)| OrderKey {
                id: RecordId::Domestic(num),
                reg_date,
                filing_date,
            }));
        }
        for chunk in international.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(
                "SELECT intl_reg_num, reg_date, filing_date FROM intl_registrations \
                 WHERE intl_reg_num IN ",
            );
            push_in_list(&mut qb, chunk);
            let rows: Vec<(String, Option<NaiveDate>, Option<NaiveDate>)> =
                qb.build_query_as().fetch_all(&self.pool).await?;
            keys.extend(rows.into_iter().map(|(num, reg_date, filing_date)| OrderKey {
                id: RecordId::International(num),
                reg_date,
                filing_date,
            }));
        }

        if keys.len() != candidates.len() {
            let found: HashSet<&RecordId> = keys.iter().map(|key| &key.id).collect();
            for id in candidates {
                if !found.contains(id) {
                    warn!(
                        identifier = %id.number(),
                        international = id.is_international(),
                        "candidate has no header row, dropping"
                    );
                }
            }
        }
        Ok(keys)
    }

    async fn assemble(&self, page: &[RecordId]) -> Result<Vec<UnifiedRecord>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        let domestic: Vec<String> = page
            .iter()
            .filter(|id| !id.is_international())
            .map(|id| id.number().to_string())
            .collect();
        let international: Vec<String> = page
            .iter()
            .filter(|id| id.is_international())
            .map(|id| id.number().to_string())
            .collect();

        let mut by_id: HashMap<RecordId, UnifiedRecord> = HashMap::with_capacity(page.len());

        if !domestic.is_empty() {
            let headers = self.fetch_domestic_headers(&domestic).await?;
            let mut phonetics = self
                .fetch_phonetics("tm_phonetics", "app_num", &domestic)
                .await?;
            let mut classes = self.fetch_classes("tm_classes", "app_num", &domestic).await?;
            for row in headers {
                let record = UnifiedRecord {
                    identifier: row.app_num.clone(),
                    display_text: row.display_text,
                    phonetics: phonetics.remove(&row.app_num).unwrap_or_default(),
                    application_date: row.filing_date,
                    registration_date: row.reg_date,
                    registration_number: registered_number(row.reg_num),
                    applicant_name: row.applicant_name,
                    rights_holder_name: row.rights_holder_name,
                    classification_entries: classes.remove(&row.app_num).unwrap_or_default(),
                    is_international: false,
                    has_image: row.has_image,
                };
                by_id.insert(RecordId::Domestic(row.app_num), record);
            }
        }

        if !international.is_empty() {
            let headers = self.fetch_international_headers(&international).await?;
            let mut phonetics = self
                .fetch_phonetics("intl_phonetics", "intl_reg_num", &international)
                .await?;
            let mut classes = self
                .fetch_classes("intl_classes", "intl_reg_num", &international)
                .await?;
            for row in headers {
                let record = UnifiedRecord {
                    identifier: row.intl_reg_num.clone(),
                    display_text: row.display_text,
                    phonetics: phonetics.remove(&row.intl_reg_num).unwrap_or_default(),
                    application_date: row.filing_date,
                    registration_date: row.reg_date,
                    registration_number: Some(row.intl_reg_num.clone()),
                    applicant_name: None,
                    rights_holder_name: row.holder_name,
                    classification_entries: classes.remove(&row.intl_reg_num).unwrap_or_default(),
                    is_international: true,
                    has_image: row.has_image,
                };
                by_id.insert(RecordId::International(row.intl_reg_num), record);
            }
        }

        let mut records = Vec::with_capacity(page.len());
        for id in page {
            match by_id.remove(id) {
                Some(record) => records.push(record),
                None => warn!(
                    identifier = %id.number(),
                    international = id.is_international(),
                    "header row vanished during assembly, skipping"
                ),
            }
        }
        Ok(records)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

impl SqliteStore {
    /// Equality lookup over a numeric identifier column, separators stripped
    /// from the incoming terms and placeholder values dropped.
    async fn fetch_identifiers(&self, sql: &str, terms: &[String]) -> Result<Vec<String>> {
        let numbers = usable_numbers(terms);
        let mut ids = Vec::new();
        for chunk in numbers.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(sql);
            push_in_list(&mut qb, chunk);
            ids.extend(
                qb.build_query_scalar::<String>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }
        Ok(ids)
    }

    /// One bulk probe of a canonical text column, all terms OR'd.
    async fn probe_ids(
        &self,
        table: &str,
        id_column: &str,
        column: &str,
        terms: &[String],
        partial: bool,
    ) -> Result<Vec<String>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::new(format!("SELECT DISTINCT {id_column} FROM {table} WHERE "));
        push_term_probe(&mut qb, column, terms, partial);
        Ok(qb.build_query_scalar::<String>().fetch_all(&self.pool).await?)
    }

    async fn resolve_text_field(
        &self,
        domestic_table: &str,
        international_table: &str,
        column: &str,
        query: &ParsedQuery,
    ) -> Result<CandidateSet> {
        let mut candidates = CandidateSet::new();
        candidates.extend(
            self.probe_ids(domestic_table, "app_num", column, &query.terms, query.partial_match)
                .await?
                .into_iter()
                .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids(
                international_table,
                "intl_reg_num",
                column,
                &query.terms,
                query.partial_match,
            )
            .await?
            .into_iter()
            .map(RecordId::International),
        );
        Ok(candidates)
    }

    /// Matches the stored readings and, additionally, the precomputed
    /// two-row alternate keys.
    async fn resolve_phonetic(&self, query: &ParsedQuery) -> Result<CandidateSet> {
        let mut candidates = self
            .resolve_text_field("tm_phonetics", "intl_phonetics", "canonical", query)
            .await?;
        candidates.extend(
            self.probe_ids("tm_mark_keys", "app_num", "key", &query.terms, query.partial_match)
                .await?
                .into_iter()
                .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids(
                "intl_mark_keys",
                "intl_reg_num",
                "key",
                &query.terms,
                query.partial_match,
            )
            .await?
            .into_iter()
            .map(RecordId::International),
        );
        Ok(candidates)
    }

    /// Strict equality on the stored readings only. Alternate keys and the
    /// partial-match flag do not apply here.
    async fn resolve_phonetic_exact(&self, terms: &[String]) -> Result<CandidateSet> {
        let mut candidates = CandidateSet::new();
        candidates.extend(
            self.probe_ids("tm_phonetics", "app_num", "canonical", terms, false)
                .await?
                .into_iter()
                .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids("intl_phonetics", "intl_reg_num", "canonical", terms, false)
                .await?
                .into_iter()
                .map(RecordId::International),
        );
        Ok(candidates)
    }

    async fn resolve_classification(&self, terms: &[String]) -> Result<CandidateSet> {
        let mut classes: Vec<String> = Vec::new();
        for term in terms {
            match normalize_class(term) {
                Some(class) => {
                    if !classes.contains(&class) {
                        classes.push(class);
                    }
                }
                None => {
                    warn!(term = %term, "not a goods/services class between 1 and 45, ignoring term")
                }
            }
        }
        let mut candidates = CandidateSet::new();
        candidates.extend(
            self.probe_ids("tm_classes", "app_num", "class_num", &classes, false)
                .await?
                .into_iter()
                .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids("intl_classes", "intl_reg_num", "class_num", &classes, false)
                .await?
                .into_iter()
                .map(RecordId::International),
        );
        Ok(candidates)
    }

    /// Exact token equality against the decoded similar-group table. A code
    /// straddling two stored tokens must never match, so no substring probe.
    async fn resolve_similar_group(&self, terms: &[String]) -> Result<CandidateSet> {
        let mut codes: Vec<String> = Vec::new();
        for term in terms {
            if term.chars().count() == SIMILAR_GROUP_TOKEN_LEN {
                codes.push(term.clone());
            } else {
                warn!(term = %term, "similar-group code is not five characters, ignoring term");
            }
        }
        let mut candidates = CandidateSet::new();
        candidates.extend(
            self.probe_ids("tm_similar_groups", "app_num", "code", &codes, false)
                .await?
                .into_iter()
                .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids("intl_similar_groups", "intl_reg_num", "code", &codes, false)
                .await?
                .into_iter()
                .map(RecordId::International),
        );
        Ok(candidates)
    }

    /// Matches any recorded spelling of the party: the master file and the
    /// partial file walk back to the applications citing their code, while
    /// rights-holder and international-holder names are stored inline. A
    /// code resolved by neither party file is displayed verbatim, so it
    /// also matches as that literal.
    async fn resolve_applicant_name(&self, query: &ParsedQuery) -> Result<CandidateSet> {
        if query.terms.is_empty() {
            return Ok(CandidateSet::new());
        }
        let mut qb = QueryBuilder::new(
            "SELECT DISTINCT l.app_num FROM tm_applicants l \
             JOIN (SELECT code FROM party_master WHERE ",
        );
        push_term_probe(&mut qb, "canonical_name", &query.terms, query.partial_match);
        qb.push(" UNION SELECT code FROM party_partial WHERE ");
        push_term_probe(&mut qb, "canonical_name", &query.terms, query.partial_match);
        qb.push(") c ON c.code = l.code");
        let ids: Vec<String> = qb.build_query_scalar().fetch_all(&self.pool).await?;

        let mut candidates: CandidateSet = ids.into_iter().map(RecordId::Domestic).collect();

        // An unresolved code is displayed verbatim; match it the same way.
        let mut qb = QueryBuilder::new("SELECT DISTINCT l.app_num FROM tm_applicants l WHERE ");
        push_term_probe(&mut qb, "l.code", &query.terms, query.partial_match);
        qb.push(
            " AND NOT EXISTS (SELECT 1 FROM party_master m WHERE m.code = l.code) \
             AND NOT EXISTS (SELECT 1 FROM party_partial p WHERE p.code = l.code)",
        );
        let code_ids: Vec<String> = qb.build_query_scalar().fetch_all(&self.pool).await?;
        candidates.extend(code_ids.into_iter().map(RecordId::Domestic));
        candidates.extend(
            self.probe_ids(
                "tm_rights_holders",
                "app_num",
                "canonical_name",
                &query.terms,
                query.partial_match,
            )
            .await?
            .into_iter()
            .map(RecordId::Domestic),
        );
        candidates.extend(
            self.probe_ids(
                "intl_holders",
                "intl_reg_num",
                "canonical_name",
                &query.terms,
                query.partial_match,
            )
            .await?
            .into_iter()
            .map(RecordId::International),
        );
        Ok(candidates)
    }

    async fn fetch_domestic_headers(&self, ids: &[String]) -> Result<Vec<DomesticHeaderRow>> {
        let mut rows = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(DOMESTIC_HEADER_SQL);
            push_in_list(&mut qb, chunk);
            rows.extend(
                qb.build_query_as::<DomesticHeaderRow>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }
        Ok(rows)
    }

    async fn fetch_international_headers(
        &self,
        ids: &[String],
    ) -> Result<Vec<InternationalHeaderRow>> {
        let mut rows = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(INTERNATIONAL_HEADER_SQL);
            push_in_list(&mut qb, chunk);
            rows.extend(
                qb.build_query_as::<InternationalHeaderRow>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }
        Ok(rows)
    }

    /// Readings per identifier, server-side concatenated in `seq` order.
    async fn fetch_phonetics(
        &self,
        table: &str,
        id_column: &str,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>> {
        let mut readings = HashMap::new();
        for chunk in ids.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(format!(
                "SELECT {id_column}, GROUP_CONCAT(reading, char(31)) \
                 FROM (SELECT {id_column}, reading FROM {table} WHERE {id_column} IN "
            ));
            push_in_list(&mut qb, chunk);
            qb.push(format!(" ORDER BY {id_column}, seq) GROUP BY {id_column}"));
            let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;
            for (id, concat) in rows {
                readings.insert(id, split_concat(&concat));
            }
        }
        Ok(readings)
    }

    /// Classification rows per identifier, one aggregated value per record.
    async fn fetch_classes(
        &self,
        table: &str,
        id_column: &str,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<ClassificationEntry>>> {
        let mut classes = HashMap::new();
        for chunk in ids.chunks(BIND_CHUNK) {
            let mut qb = QueryBuilder::new(format!(
                "SELECT {id_column}, GROUP_CONCAT(class_num || char(31) || \
                 COALESCE(similar_groups, '') || char(31) || COALESCE(goods_text, ''), char(30)) \
                 FROM (SELECT {id_column}, class_num, similar_groups, goods_text \
                 FROM {table} WHERE {id_column} IN "
            ));
            push_in_list(&mut qb, chunk);
            qb.push(format!(" ORDER BY {id_column}, class_num) GROUP BY {id_column}"));
            let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;
            for (id, concat) in rows {
                classes.insert(id, parse_class_entries(&concat));
            }
        }
        Ok(classes)
    }
}

#[derive(sqlx::FromRow)]
struct DomesticHeaderRow {
    app_num: String,
    filing_date: Option<NaiveDate>,
    reg_date: Option<NaiveDate>,
    reg_num: Option<String>,
    display_text: Option<String>,
    applicant_name: Option<String>,
    rights_holder_name: Option<String>,
    has_image: bool,
}

#[derive(sqlx::FromRow)]
struct InternationalHeaderRow {
    intl_reg_num: String,
    filing_date: Option<NaiveDate>,
    reg_date: Option<NaiveDate>,
    display_text: Option<String>,
    holder_name: Option<String>,
    has_image: bool,
}

fn push_in_list(qb: &mut QueryBuilder<'_, Sqlite>, values: &[String]) {
    qb.push("(");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push_bind(value.clone());
    }
    qb.push(")");
}

fn push_term_probe(
    qb: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    terms: &[String],
    partial: bool,
) {
    qb.push("(");
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(column);
        if partial {
            qb.push(" LIKE ")
                .push_bind(format!("%{}%", escape_like(term)))
                .push(" ESCAPE '\\'");
        } else {
            qb.push(" = ").push_bind(term.clone());
        }
    }
    qb.push(")");
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Digits of each identifier term, separators dropped. Terms without digits
/// and the all-zero placeholder are skipped with a warning; duplicates
/// collapse to the first occurrence.
fn usable_numbers(terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut numbers = Vec::new();
    for term in terms {
        let digits: String = term.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            warn!(term = %term, "identifier term has no digits, ignoring term");
            continue;
        }
        if digits.bytes().all(|b| b == b'0') {
            warn!(term = %term, "identifier term is the unregistered placeholder, ignoring term");
            continue;
        }
        if seen.insert(digits.clone()) {
            numbers.push(digits);
        }
    }
    numbers
}

/// Two-digit class token for values 1 through 45.
fn normalize_class(term: &str) -> Option<String> {
    let value: u32 = term.parse().ok()?;
    if (1..=45).contains(&value) {
        Some(format!("{value:02}"))
    } else {
        None
    }
}

/// The stored registration number, unless it is the all-zero placeholder
/// meaning not yet registered.
fn registered_number(raw: Option<String>) -> Option<String> {
    raw.filter(|num| !num.is_empty() && !num.bytes().all(|b| b == b'0'))
}

fn split_concat(raw: &str) -> Vec<String> {
    raw.split(UNIT_SEP)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_class_entries(raw: &str) -> Vec<ClassificationEntry> {
    raw.split(RECORD_SEP)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, UNIT_SEP);
            let class_number = parts.next().unwrap_or_default().to_string();
            let groups = parts.next().unwrap_or_default();
            let goods = parts.next().unwrap_or_default();
            ClassificationEntry {
                class_number,
                similar_group_codes: decode_similar_groups(groups),
                goods_text: (!goods.is_empty()).then(|| goods.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("100%_PURE\\"), "100\\%\\_PURE\\\\");
        assert_eq!(escape_like("ソニ-"), "ソニ-");
    }

    #[test]
    fn keeps_only_usable_numbers() {
        let terms = vec![
            "2020-138119".to_string(),
            "2020/138119".to_string(),
            "0000000".to_string(),
            "第501234号".to_string(),
            "ソニ-".to_string(),
        ];
        assert_eq!(
            usable_numbers(&terms),
            vec!["2020138119".to_string(), "501234".to_string()]
        );
    }

    #[test]
    fn normalizes_class_tokens() {
        assert_eq!(normalize_class("9"), Some("09".to_string()));
        assert_eq!(normalize_class("09"), Some("09".to_string()));
        assert_eq!(normalize_class("45"), Some("45".to_string()));
        assert_eq!(normalize_class("0"), None);
        assert_eq!(normalize_class("46"), None);
        assert_eq!(normalize_class("IX"), None);
    }

    #[test]
    fn filters_placeholder_registration_numbers() {
        assert_eq!(registered_number(Some("0000000".to_string())), None);
        assert_eq!(registered_number(Some(String::new())), None);
        assert_eq!(
            registered_number(Some("6543210".to_string())),
            Some("6543210".to_string())
        );
        assert_eq!(registered_number(None), None);
    }

    #[test]
    fn splits_aggregated_readings() {
        assert_eq!(
            split_concat("ソニ-\u{1f}ソニ-グル-プ"),
            vec!["ソニ-".to_string(), "ソニ-グル-プ".to_string()]
        );
        assert!(split_concat("").is_empty());
    }

    #[test]
    fn parses_aggregated_class_entries() {
        let raw = format!(
            "09{u}11C0111C02{u}電子計算機{r}25{u}{u}",
            u = UNIT_SEP,
            r = RECORD_SEP
        );
        let entries = parse_class_entries(&raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].class_number, "09");
        assert_eq!(
            entries[0].similar_group_codes,
            vec!["11C01".to_string(), "11C02".to_string()]
        );
        assert_eq!(entries[0].goods_text.as_deref(), Some("電子計算機"));
        assert_eq!(entries[1].class_number, "25");
        assert!(entries[1].similar_group_codes.is_empty());
        assert_eq!(entries[1].goods_text, None);
    }
}
