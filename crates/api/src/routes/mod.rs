pub mod health;
pub mod invitation;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                           list mine, create
/// /projects/{project_id}                              get, update, delete
/// /projects/{project_id}/leave                        leave (POST)
/// /projects/{project_id}/members                      list
/// /projects/{project_id}/members/{user_id}            update role, remove
/// /projects/{project_id}/invitations                  list, invite
/// /projects/{project_id}/invitations/{id}             cancel
/// /projects/{project_id}/languages                    list, create
/// /projects/{project_id}/languages/{id}               rename, delete
/// /projects/{project_id}/groups                       list, create
/// /projects/{project_id}/groups/{id}                  rename, delete
/// /projects/{project_id}/keys                         list, create
/// /projects/{project_id}/keys/{key_id}                get, update, delete
/// /projects/{project_id}/keys/{key_id}/values         list, create
/// /projects/{project_id}/keys/{key_id}/values/{id}    update, delete
///
/// /invitations                                        list mine
/// /invitations/{id}/accept                            accept (POST)
/// /invitations/{id}/decline                           decline (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/invitations", invitation::router())
}
