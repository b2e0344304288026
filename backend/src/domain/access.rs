//! Role allow-lists and the authorization guard.
//!
//! Every protected operation is listed exactly once in [`ACCESS_RULES`]. The
//! guard compares the caller's role against that list and nothing else; roles
//! carry no implicit ordering, so an Admin is not automatically allowed to do
//! what a Doctor may do.

use super::{EntityKind, Error, Principal, Record, Role, UserId};

/// Operations exposed for every entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Insert a new row.
    Create,
    /// Read every visible row.
    List,
    /// Read one row by key.
    Get,
    /// Replace the mutable fields of a row.
    Update,
    /// Remove a row.
    Delete,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::List,
        Self::Get,
        Self::Update,
        Self::Delete,
    ];
}

/// One row of the allow-list table.
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    /// Entity the rule governs.
    pub kind: EntityKind,
    /// Operation the rule governs.
    pub action: Action,
    /// Roles permitted to perform it.
    pub roles: &'static [Role],
}

const ANY: &[Role] = &[Role::Patient, Role::Doctor, Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Doctor];
const DOCTOR: &[Role] = &[Role::Doctor];
const ADMIN: &[Role] = &[Role::Admin];

macro_rules! rules {
    ($( $kind:ident: [$create:ident, $list:ident, $get:ident, $update:ident, $delete:ident]; )*) => {
        &[
            $(
                AccessRule { kind: EntityKind::$kind, action: Action::Create, roles: $create },
                AccessRule { kind: EntityKind::$kind, action: Action::List, roles: $list },
                AccessRule { kind: EntityKind::$kind, action: Action::Get, roles: $get },
                AccessRule { kind: EntityKind::$kind, action: Action::Update, roles: $update },
                AccessRule { kind: EntityKind::$kind, action: Action::Delete, roles: $delete },
            )*
        ]
    };
}

/// Allow-list for every (entity, action) pair.
///
/// User creation is public signup, so `ANY` there means "no principal
/// required"; the HTTP layer does not consult the guard for it.
pub const ACCESS_RULES: &[AccessRule] = rules! {
    User: [ANY, STAFF, ANY, ADMIN, ADMIN];
    Appointment: [STAFF, ANY, ANY, STAFF, STAFF];
    Prescription: [DOCTOR, ANY, ANY, DOCTOR, DOCTOR];
    Inventory: [ADMIN, ADMIN, ADMIN, ADMIN, ADMIN];
    Payment: [ADMIN, ADMIN, ADMIN, ADMIN, ADMIN];
    LabTest: [DOCTOR, ANY, ANY, DOCTOR, DOCTOR];
    MedicalRecord: [DOCTOR, ANY, ANY, DOCTOR, DOCTOR];
};

/// Roles allowed to perform `action` on `kind`.
///
/// Returns an empty slice for pairs missing from the table, which the guard
/// treats as "nobody".
///
/// # Examples
/// ```
/// use clinic_backend::domain::{Action, EntityKind, Role, allowed_roles};
///
/// assert_eq!(allowed_roles(EntityKind::Payment, Action::Get), &[Role::Admin]);
/// ```
#[must_use]
pub fn allowed_roles(kind: EntityKind, action: Action) -> &'static [Role] {
    ACCESS_RULES
        .iter()
        .find(|rule| rule.kind == kind && rule.action == action)
        .map_or(&[], |rule| rule.roles)
}

/// Admit `principal` when its role is in `allowed`.
pub fn authorize<'a>(principal: &'a Principal, allowed: &[Role]) -> Result<&'a Principal, Error> {
    if allowed.contains(&principal.role()) {
        Ok(principal)
    } else {
        tracing::debug!(
            role = %principal.role(),
            user_id = %principal.user_id(),
            "role not in allow-list"
        );
        Err(Error::forbidden("Insufficient privileges"))
    }
}

/// Check the table entry for `(kind, action)` against `principal`.
pub fn guard(principal: &Principal, kind: EntityKind, action: Action) -> Result<(), Error> {
    authorize(principal, allowed_roles(kind, action)).map(|_| ())
}

/// Rows a principal may observe through a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// Every row of the kind.
    All,
    /// Only rows owned by this patient.
    Patient(UserId),
}

impl ReadScope {
    /// Whether a row owned by `owner` is visible in this scope.
    #[must_use]
    pub fn admits(self, owner: Option<UserId>) -> bool {
        match self {
            Self::All => true,
            Self::Patient(patient) => owner == Some(patient),
        }
    }

    /// Whether `record` is visible in this scope.
    #[must_use]
    pub fn admits_record(self, record: &Record) -> bool {
        self.admits(record.patient_id())
    }
}

/// Guard a read and derive the visibility scope for it.
///
/// Patients reading a patient-owned kind see only their own rows; every
/// other allowed read is unrestricted.
pub fn read_scope(
    principal: &Principal,
    kind: EntityKind,
    action: Action,
) -> Result<ReadScope, Error> {
    guard(principal, kind, action)?;
    if principal.role() == Role::Patient && kind.is_patient_owned() {
        Ok(ReadScope::Patient(principal.user_id()))
    } else {
        Ok(ReadScope::All)
    }
}
