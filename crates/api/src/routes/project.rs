//! Route definitions for the `/projects` resource and everything nested
//! under a project.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{group, invitation, key, language, member, project, value};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{project_id}                                  -> get_by_id
/// PUT    /{project_id}                                  -> update
/// DELETE /{project_id}                                  -> delete
/// POST   /{project_id}/leave                            -> leave
///
/// GET    /{project_id}/members                          -> list
/// PUT    /{project_id}/members/{user_id}                -> update_role
/// DELETE /{project_id}/members/{user_id}                -> remove
///
/// GET    /{project_id}/invitations                      -> list_for_project
/// POST   /{project_id}/invitations                      -> invite
/// DELETE /{project_id}/invitations/{id}                 -> cancel
///
/// GET    /{project_id}/languages                        -> list
/// POST   /{project_id}/languages                        -> create
/// PUT    /{project_id}/languages/{id}                   -> update
/// DELETE /{project_id}/languages/{id}                   -> delete
///
/// GET    /{project_id}/groups                           -> list
/// POST   /{project_id}/groups                           -> create
/// PUT    /{project_id}/groups/{id}                      -> update
/// DELETE /{project_id}/groups/{id}                      -> delete
///
/// GET    /{project_id}/keys                             -> list
/// POST   /{project_id}/keys                             -> create
/// GET    /{project_id}/keys/{key_id}                    -> get_by_id
/// PUT    /{project_id}/keys/{key_id}                    -> update
/// DELETE /{project_id}/keys/{key_id}                    -> delete
///
/// GET    /{project_id}/keys/{key_id}/values             -> list
/// POST   /{project_id}/keys/{key_id}/values             -> create
/// PUT    /{project_id}/keys/{key_id}/values/{id}        -> update
/// DELETE /{project_id}/keys/{key_id}/values/{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    let member_routes = Router::new()
        .route("/", get(member::list))
        .route("/{user_id}", put(member::update_role).delete(member::remove));

    let invitation_routes = Router::new()
        .route(
            "/",
            get(invitation::list_for_project).post(invitation::invite),
        )
        .route("/{id}", delete(invitation::cancel));

    let language_routes = Router::new()
        .route("/", get(language::list).post(language::create))
        .route("/{id}", put(language::update).delete(language::delete));

    let group_routes = Router::new()
        .route("/", get(group::list).post(group::create))
        .route("/{id}", put(group::update).delete(group::delete));

    let value_routes = Router::new()
        .route("/", get(value::list).post(value::create))
        .route("/{id}", put(value::update).delete(value::delete));

    let key_routes = Router::new()
        .route("/", get(key::list).post(key::create))
        .route(
            "/{key_id}",
            get(key::get_by_id).put(key::update).delete(key::delete),
        )
        .nest("/{key_id}/values", value_routes);

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project_id}/leave", post(project::leave))
        .nest("/{project_id}/members", member_routes)
        .nest("/{project_id}/invitations", invitation_routes)
        .nest("/{project_id}/languages", language_routes)
        .nest("/{project_id}/groups", group_routes)
        .nest("/{project_id}/keys", key_routes)
}
