//! Annotation store queries
//!
//! Raw rows come back exactly as stored, ordered by primary key: that fetch
//! order is significant input to the coalescer, which relies on fragment
//! rows preceding their anchor row.

use sqlx::SqlitePool;

use crate::annotations::Annotation;
use crate::error::Result;

use super::books::core_data_timestamp;

/// One row of the ZAEANNOTATION table, columns as consumed
#[derive(Debug, sqlx::FromRow)]
struct RawAnnotationRow {
    id: Option<String>,
    asset_id: String,
    selected_text: String,
    note: Option<String>,
    location: Option<String>,
    physical_location: Option<i64>,
    style: Option<i64>,
    is_underline: Option<i64>,
    chapter_hint: Option<String>,
    creation_date: Option<f64>,
    modification_date: Option<f64>,
}

impl From<RawAnnotationRow> for Annotation {
    fn from(row: RawAnnotationRow) -> Self {
        Annotation {
            id: row.id.unwrap_or_default(),
            asset_id: row.asset_id,
            selected_text: row.selected_text,
            note: row.note,
            // Treat blank location strings the same as NULL
            location: row.location.filter(|l| !l.trim().is_empty()),
            physical_location: row.physical_location.filter(|p| *p >= 0),
            style: row.style,
            is_underline: row.is_underline.unwrap_or(0) != 0,
            chapter_hint: row.chapter_hint,
            created_at: core_data_timestamp(row.creation_date),
            modified_at: core_data_timestamp(row.modification_date),
        }
    }
}

/// Asset ids of every book with at least one live highlight
pub async fn fetch_annotated_asset_ids(pool: &SqlitePool) -> Result<Vec<String>> {
    let ids: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT ZANNOTATIONASSETID
        FROM ZAEANNOTATION
        WHERE ZANNOTATIONASSETID IS NOT NULL
          AND ZANNOTATIONDELETED = 0
          AND ZANNOTATIONSELECTEDTEXT IS NOT NULL
        ORDER BY ZANNOTATIONASSETID
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Fetch the raw annotation rows for one book, in stored order
pub async fn fetch_raw_annotations(pool: &SqlitePool, asset_id: &str) -> Result<Vec<Annotation>> {
    let rows: Vec<RawAnnotationRow> = sqlx::query_as(
        r#"
        SELECT ZANNOTATIONUUID as id,
               ZANNOTATIONASSETID as asset_id,
               ZANNOTATIONSELECTEDTEXT as selected_text,
               ZANNOTATIONNOTE as note,
               ZANNOTATIONLOCATION as location,
               ZPLLOCATIONRANGESTART as physical_location,
               ZANNOTATIONSTYLE as style,
               ZANNOTATIONISUNDERLINE as is_underline,
               ZFUTUREPROOFING5 as chapter_hint,
               ZANNOTATIONCREATIONDATE as creation_date,
               ZANNOTATIONMODIFICATIONDATE as modification_date
        FROM ZAEANNOTATION
        WHERE ZANNOTATIONASSETID = ?
          AND ZANNOTATIONDELETED = 0
          AND ZANNOTATIONSELECTEDTEXT IS NOT NULL
        ORDER BY Z_PK ASC
        "#,
    )
    .bind(asset_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Annotation::from).collect())
}
