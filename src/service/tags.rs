//! Tag operations

use tracing::info;

use super::{require_name, ApiError, ApiResult, DeleteResponse, ListQuery};
use crate::db::Database;
use crate::models::{Tag, TagCreate};

/// Create a tag; names are unique
pub fn create_tag(db: &Database, data: TagCreate) -> ApiResult<Tag> {
    let name = require_name(&data.name, "Tag")?;

    db.with_conn(|conn| {
        if Tag::get_by_name(conn, &name)?.is_some() {
            return Err(ApiError::bad_request("Tag already exists."));
        }
        let tag = Tag::create(conn, &name).map_err(ApiError::duplicate("Tag already exists."))?;
        info!("Created tag {} ({})", tag.id, tag.name);
        Ok(tag)
    })
}

/// List tags in id order
pub fn list_tags(db: &Database, query: &ListQuery) -> ApiResult<Vec<Tag>> {
    let (limit, offset) = query.page();
    db.with_conn(|conn| Ok(Tag::list(conn, query.search(), limit, offset)?))
}

pub fn get_tag(db: &Database, id: i64) -> ApiResult<Tag> {
    db.with_conn(|conn| {
        Tag::get_by_id(conn, id)?
            .ok_or_else(|| ApiError::not_found(format!("Tag with ID {} not found", id)))
    })
}

/// Delete a tag, detaching it from every recipe
pub fn delete_tag(db: &Database, id: i64) -> ApiResult<DeleteResponse> {
    db.with_conn(|conn| {
        if !Tag::delete(conn, id)? {
            return Err(ApiError::bad_request(format!(
                "could not delete tag with id: {}; (it probably does not exist anymore)",
                id
            )));
        }
        info!("Deleted tag {}", id);
        Ok(DeleteResponse {
            details: format!("deleted tag with id: {}", id),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::test_db;

    fn tag(name: &str) -> TagCreate {
        TagCreate {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_create_trims_and_rejects_duplicates() {
        let (_dir, db) = test_db();
        let created = create_tag(&db, tag("  dinner ")).unwrap();
        assert_eq!(created.name, "dinner");

        let err = create_tag(&db, tag("dinner")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Tag already exists."));
        assert!(matches!(create_tag(&db, tag("")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, db) = test_db();
        assert!(matches!(get_tag(&db, 7), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_list_with_search() {
        let (_dir, db) = test_db();
        for name in ["breakfast", "brunch", "dinner"] {
            create_tag(&db, tag(name)).unwrap();
        }
        let query = ListQuery {
            q: Some("br".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(list_tags(&db, &query).unwrap().len(), 2);
        assert_eq!(list_tags(&db, &ListQuery::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_twice() {
        let (_dir, db) = test_db();
        let created = create_tag(&db, tag("snack")).unwrap();

        let deleted = delete_tag(&db, created.id).unwrap();
        assert_eq!(deleted.details, format!("deleted tag with id: {}", created.id));

        let err = delete_tag(&db, created.id).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "could not delete tag with id: {}; (it probably does not exist anymore)",
                created.id
            )
        );
    }
}
