//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/signup          {"full_name":..,"email":..,"phone_number":..,"role":..,"password":..}
//! POST   /api/v1/login           {"username":"alice@x.com","password":"..."}  (JSON or form)
//! GET    /api/v1/me
//! POST   /api/v1/reset-password  {"email":..,"new_password":..}
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}      {"full_name"?,"phone_number"?,"password"?}
//! DELETE /api/v1/users/{id}
//! ```

use std::str::FromStr;

use actix_web::{Either, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Email, IssuedToken, LoginCredentials, Password, PasswordReset, ProfileUpdate, Role,
    SignupProfile, UserAccount, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ErrorSchema, UserAccountSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_field_error, role_field_error, user_field_error, user_field_error_as,
};

/// Signup request body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SignupRequest {
    /// Display name.
    #[schema(example = "Alice Liddell")]
    pub full_name: String,
    /// Login address; must be unique.
    #[schema(example = "alice@x.com")]
    pub email: String,
    /// Contact number; must be unique.
    #[schema(example = "+44 7700 900001")]
    pub phone_number: String,
    /// `Patient`, `Doctor`, or `Admin` (case-insensitive).
    #[schema(example = "Patient")]
    pub role: String,
    /// Plaintext password, at least 8 characters.
    pub password: String,
}

impl SignupRequest {
    fn into_profile(self) -> ApiResult<SignupProfile> {
        let role = Role::from_str(&self.role).map_err(|err| role_field_error(&err))?;
        SignupProfile::try_from_parts(
            &self.full_name,
            &self.email,
            &self.phone_number,
            role,
            &self.password,
        )
        .map_err(|err| user_field_error(&err))
    }
}

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"alice@x.com","password":"correct horse"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Email address of the account.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = crate::domain::LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Token returned by a successful login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Seconds until the token stops being accepted.
    #[schema(example = 3600)]
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: IssuedToken::TOKEN_TYPE.to_owned(),
            expires_in: token.expires_in,
        }
    }
}

/// Body for `POST /api/v1/reset-password`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PasswordResetRequest {
    /// Account whose password is replaced.
    pub email: String,
    /// Replacement password, at least 8 characters.
    pub new_password: String,
}

impl PasswordResetRequest {
    fn into_reset(self) -> ApiResult<PasswordReset> {
        Ok(PasswordReset {
            email: Email::new(&self.email).map_err(|err| user_field_error(&err))?,
            new_password: Password::new(self.new_password)
                .map_err(|err| user_field_error_as(FieldName::new("new_password"), &err))?,
        })
    }
}

/// Body for `PUT /api/v1/users/{id}`. Role and email cannot be changed.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    /// Replacement display name.
    pub full_name: Option<String>,
    /// Replacement contact number.
    pub phone_number: Option<String>,
    /// Replacement password.
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn into_update(self) -> ApiResult<ProfileUpdate> {
        ProfileUpdate::try_from_parts(
            self.full_name.as_deref(),
            self.phone_number.as_deref(),
            self.password.as_deref(),
        )
        .map_err(|err| user_field_error(&err))
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserAccountSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or phone number already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let profile = payload.into_inner().into_profile()?;
    let account = state.accounts.signup(profile).await?;
    Ok(HttpResponse::Created().json(account))
}

/// Exchange credentials for a bearer token.
///
/// Accepts a JSON body or an `application/x-www-form-urlencoded` form with
/// the same fields. Unknown emails and wrong passwords are indistinguishable.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
) -> ApiResult<web::Json<TokenResponse>> {
    let request = match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    let credentials = LoginCredentials::try_from(request).map_err(|err| login_field_error(&err))?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse::from(token)))
}

/// Public projection of the caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserAccountSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<UserAccount>> {
    let account = state.accounts.me(auth.principal()).await?;
    Ok(web::Json(account))
}

/// Replace an account password. Callers may reset their own password; an
/// Admin may reset anyone's.
#[utoipa::path(
    post,
    path = "/api/v1/reset-password",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown email", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let reset = payload.into_inner().into_reset()?;
    state.accounts.reset_password(auth.principal(), reset).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List every account. Admin and Doctor only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserAccountSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<UserAccount>>> {
    let users = state.accounts.list(auth.principal()).await?;
    Ok(web::Json(users))
}

/// Fetch one account by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserAccountSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<UserAccount>> {
    let account = state.accounts.get(auth.principal(), path.into_inner()).await?;
    Ok(web::Json(account))
}

/// Update the mutable profile fields of an account. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserAccountSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Phone number already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<UserId>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserAccount>> {
    let update = payload.into_inner().into_update()?;
    let account = state
        .accounts
        .update(auth.principal(), path.into_inner(), update)
        .await?;
    Ok(web::Json(account))
}

/// Delete an account that nothing references any more. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Still referenced by dependent rows", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .delete(auth.principal(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
