use tracing::{info, warn};

use super::{Resource, ResourceForm};
use crate::api::ApiError;
use crate::models::{Category, User};
use crate::session::AppContext;

const LOADING_GLYPH: &str = "⌛";
const UNKNOWN_GLYPH: &str = "❓";

/// Edit and delete are disabled while the sibling form holds a record.
pub fn row_actions_enabled<R: Resource>(form: &ResourceForm<R>) -> bool {
    !form.is_editing()
}

/// Confirmation text shown before a delete.
pub fn delete_prompt<R: Resource>() -> String {
    format!("Do you really want to delete this {}?", R::NAME)
}

/// `DELETE /<resource>/<id>`. The caller re-fetches on success; on failure the
/// row is left as it is.
pub fn delete_row<R: Resource>(ctx: &AppContext, id: &str) -> Result<(), ApiError> {
    let token = ctx.bearer()?;
    match R::delete(ctx.api(), &token, id) {
        Ok(()) => {
            info!("Deleted {} {id}", R::NAME);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to delete {} {id}: {e}", R::NAME);
            Err(e)
        }
    }
}

/// Icon shown for a transaction's category. Never fails on a dangling reference.
pub fn category_icon(user: Option<&User>, category_id: Option<&str>) -> String {
    let Some(user) = user else {
        return LOADING_GLYPH.to_string();
    };
    category_id
        .and_then(|id| Category::find_by_id(&user.categories, id))
        .map(|c| c.display_icon())
        .unwrap_or_else(|| UNKNOWN_GLYPH.to_string())
}
