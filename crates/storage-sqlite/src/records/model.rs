//! Database model for stored documents.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the `documents` table. `data` holds the JSON object;
/// `updated_at` is an RFC 3339 stamp of the last merge.
#[derive(Queryable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DocumentDB {
    pub collection: String,
    pub id: String,
    pub data: String,
    pub updated_at: String,
}
