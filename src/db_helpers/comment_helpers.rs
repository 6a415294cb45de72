use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::CommentRequest,
    errors::RequestError,
    models::Comment,
};

use super::get_article_id_by_slug_in_db;

const COMMENT_QUERY: &str = r#"
    SELECT comments.id,
           comments.article_id,
           comments.user_id,
           users.username,
           comments.body,
           comments.parent_comment_id,
           comments.created_at
      FROM comments
      JOIN users ON users.id = comments.user_id
"#;

pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Vec<Comment>, RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;
    let query = format!("{COMMENT_QUERY} WHERE comments.article_id = ? ORDER BY comments.id ASC");
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Orders a flat comment list into threads: top-level comments newest
/// first, each with its replies oldest first. Replies never nest
/// further, so one level is all there is.
pub fn thread_comments(comments: Vec<Comment>) -> Vec<(Comment, Vec<Comment>)> {
    let (top_level, replies): (Vec<Comment>, Vec<Comment>) = comments
        .into_iter()
        .partition(|comment| comment.parent_comment_id.is_none());

    let mut threads: Vec<(Comment, Vec<Comment>)> = top_level
        .into_iter()
        .rev()
        .map(|comment| (comment, Vec::new()))
        .collect();
    for reply in replies {
        if let Some((_, children)) = threads
            .iter_mut()
            .find(|(parent, _)| Some(parent.id) == reply.parent_comment_id)
        {
            children.push(reply);
        }
    }
    threads
}

pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    user_id: i64,
    slug: &str,
    request: &CommentRequest,
) -> Result<Comment, RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;

    if let Some(parent_id) = request.parent_comment_id {
        let parent = sqlx::query_as::<Sqlite, (i64, Option<i64>)>(
            "SELECT article_id, parent_comment_id FROM comments WHERE id = ?",
        )
        .bind(parent_id)
        .fetch_optional(pool)
        .await?;
        match parent {
            None => return Err(RequestError::NotFound("Comment not found")),
            Some((parent_article_id, _)) if parent_article_id != article_id => {
                return Err(RequestError::Validation(
                    "Parent comment belongs to a different article",
                ));
            }
            Some((_, Some(_))) => {
                return Err(RequestError::Validation("Replies can only go one level deep"));
            }
            Some(_) => {}
        }
    }

    let result = sqlx::query(
        "INSERT INTO comments (article_id, user_id, body, parent_comment_id) VALUES (?, ?, ?, ?)",
    )
    .bind(article_id)
    .bind(user_id)
    .bind(request.body.trim())
    .bind(request.parent_comment_id)
    .execute(pool)
    .await?;

    let query = format!("{COMMENT_QUERY} WHERE comments.id = ?");
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await?;
    Ok(comment)
}

/// Authors can only remove their own comments.
pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    user_id: i64,
    slug: &str,
    comment_id: i64,
) -> Result<(), RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;
    let result = sqlx::query(
        "DELETE FROM comments WHERE id = ? AND article_id = ? AND user_id = ?",
    )
    .bind(comment_id)
    .bind(article_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn comment(id: i64, parent: Option<i64>) -> Comment {
        Comment {
            id,
            article_id: 1,
            user_id: 1,
            username: "ravi".to_string(),
            body: format!("comment {id}"),
            parent_comment_id: parent,
            created_at: NaiveDateTime::from_timestamp_opt(id, 0).unwrap(),
        }
    }

    #[test]
    fn top_level_comments_come_newest_first() {
        let threads = thread_comments(vec![comment(1, None), comment(2, None), comment(3, None)]);
        let ids: Vec<i64> = threads.iter().map(|(c, _)| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn replies_attach_to_their_parent_oldest_first() {
        let threads = thread_comments(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(1)),
        ]);
        assert_eq!(threads.len(), 2);
        let (parent, replies) = &threads[1];
        assert_eq!(parent.id, 1);
        let reply_ids: Vec<i64> = replies.iter().map(|c| c.id).collect();
        assert_eq!(reply_ids, vec![2, 4]);
    }
}
