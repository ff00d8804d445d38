//! In-memory fakes shared by the service tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use warden_core::{AppError, AppResult};
use warden_domain::{
    BrokerId, EmailAddress, PasswordResetRequest, Permission, PermissionId, ResetRequestId, Role,
    RoleId, UserAccount, UserId,
};

use crate::{
    BrokerUserGateway, Clock, EmailMessage, EmailService, Localization, Localizer,
    PasswordHasher, PasswordResetRepository, PermissionRepository, RoleRecord, RoleRepository,
    TransactionGateway, UserRepository, UserRoleRepository,
};

#[derive(Default)]
struct AccessControlState {
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, RoleRecord>,
    assignments: BTreeSet<(UserId, RoleId)>,
}

/// Single store backing the three access-control repository ports.
#[derive(Default)]
pub(crate) struct FakeAccessControlStore {
    state: Mutex<AccessControlState>,
}

impl FakeAccessControlStore {
    pub(crate) async fn role_permission_ids(&self, role_id: RoleId) -> Option<Vec<PermissionId>> {
        self.state
            .lock()
            .await
            .roles
            .get(&role_id)
            .map(|record| record.permission_ids.clone())
    }

    pub(crate) async fn role_count(&self) -> usize {
        self.state.lock().await.roles.len()
    }

    pub(crate) async fn assignment_count(&self) -> usize {
        self.state.lock().await.assignments.len()
    }
}

#[async_trait]
impl PermissionRepository for FakeAccessControlStore {
    async fn create_permission(&self, permission: &Permission) -> AppResult<()> {
        self.state
            .lock()
            .await
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self.state.lock().await.permissions.get(&permission_id).cloned())
    }

    async fn update_permission(&self, permission: &Permission) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let slot = state.permissions.get_mut(&permission.id()).ok_or_else(|| {
            AppError::NotFound(format!("permission '{}' does not exist", permission.id()))
        })?;
        *slot = permission.clone();
        Ok(())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.state
            .lock()
            .await
            .permissions
            .remove(&permission_id)
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.state.lock().await.permissions.values().cloned().collect();
        permissions.sort_by(|left, right| left.value().cmp(right.value()));
        Ok(permissions)
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| state.permissions.get(permission_id).cloned())
            .collect())
    }
}

#[async_trait]
impl RoleRepository for FakeAccessControlStore {
    async fn create_role(&self, role: &Role, permission_ids: &[PermissionId]) -> AppResult<()> {
        self.state.lock().await.roles.insert(
            role.id(),
            RoleRecord {
                role: role.clone(),
                permission_ids: permission_ids.to_vec(),
            },
        );
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        Ok(self.state.lock().await.roles.get(&role_id).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let mut roles: Vec<RoleRecord> = self.state.lock().await.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.role.name().cmp(right.role.name()));
        Ok(roles)
    }

    async fn list_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleRecord>> {
        let state = self.state.lock().await;
        Ok(role_ids
            .iter()
            .filter_map(|role_id| state.roles.get(role_id).cloned())
            .collect())
    }

    async fn update_role(
        &self,
        role: &Role,
        permission_ids: Option<&[PermissionId]>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let record = state
            .roles
            .get_mut(&role.id())
            .ok_or_else(|| AppError::NotFound(format!("role '{}' does not exist", role.id())))?;

        record.role = role.clone();
        if let Some(permission_ids) = permission_ids {
            record.permission_ids = permission_ids.to_vec();
        }
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.roles.remove(&role_id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        state
            .assignments
            .retain(|(_, assigned_role)| *assigned_role != role_id);
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let record = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        record.permission_ids = permission_ids.to_vec();
        Ok(())
    }
}

#[async_trait]
impl UserRoleRepository for FakeAccessControlStore {
    async fn add_users_to_role(&self, role_id: RoleId, user_ids: &[UserId]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .assignments
            .extend(user_ids.iter().map(|user_id| (*user_id, role_id)));
        Ok(())
    }

    async fn remove_users_from_role(
        &self,
        role_id: RoleId,
        user_ids: &[UserId],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for user_id in user_ids {
            state.assignments.remove(&(*user_id, role_id));
        }
        Ok(())
    }

    async fn replace_roles_for_user(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .assignments
            .retain(|(assigned_user, _)| *assigned_user != user_id);
        state
            .assignments
            .extend(role_ids.iter().map(|role_id| (user_id, *role_id)));
        Ok(())
    }

    async fn list_users_for_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        Ok(self
            .state
            .lock()
            .await
            .assignments
            .iter()
            .filter(|(_, assigned_role)| *assigned_role == role_id)
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        Ok(self
            .state
            .lock()
            .await
            .assignments
            .iter()
            .filter(|(assigned_user, _)| *assigned_user == user_id)
            .map(|(_, role_id)| *role_id)
            .collect())
    }
}

/// Reset request store enforcing one stored request per user.
#[derive(Default)]
pub(crate) struct FakePasswordResetRepository {
    requests: Mutex<HashMap<ResetRequestId, PasswordResetRequest>>,
    fail_deletes: AtomicBool,
}

impl FakePasswordResetRepository {
    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub(crate) async fn stored_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PasswordResetRepository for FakePasswordResetRepository {
    async fn create_request(&self, request: &PasswordResetRequest) -> AppResult<()> {
        let mut requests = self.requests.lock().await;
        if requests
            .values()
            .any(|existing| existing.user_id() == request.user_id())
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already has a stored password reset request",
                request.user_id()
            )));
        }

        requests.insert(request.id(), request.clone());
        Ok(())
    }

    async fn find_request(
        &self,
        request_id: ResetRequestId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        Ok(self.requests.lock().await.get(&request_id).cloned())
    }

    async fn find_request_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        Ok(self
            .requests
            .lock()
            .await
            .values()
            .find(|request| request.user_id() == user_id)
            .cloned())
    }

    async fn delete_request(&self, request_id: ResetRequestId) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("reset store is unavailable".to_owned()));
        }

        self.requests.lock().await.remove(&request_id);
        Ok(())
    }
}

/// Clock frozen at a settable instant.
pub(crate) struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub(crate) fn at(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub(crate) fn advance(&self, by: chrono::Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Email service that records messages or fails on demand.
#[derive(Default)]
pub(crate) struct RecordingEmailService {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingEmailService {
    pub(crate) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(true),
        }
    }

    pub(crate) async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(&self, message: &EmailMessage) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("smtp relay rejected the message".to_owned()));
        }

        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

struct FakeLocalizer {
    language_tag: String,
}

impl Localizer for FakeLocalizer {
    fn language_tag(&self) -> &str {
        &self.language_tag
    }

    fn message(&self, key: &str) -> String {
        match key {
            crate::RESET_SUBJECT_KEY => "Reset your password".to_owned(),
            crate::RESET_BODY_KEY => "Open {link} before {expires_at}".to_owned(),
            other => other.to_owned(),
        }
    }
}

/// Localization that serves fixed English texts for every tag, or fails
/// every lookup when built with `failing`.
#[derive(Default)]
pub(crate) struct FakeLocalization {
    fail: bool,
}

impl FakeLocalization {
    pub(crate) fn failing() -> Self {
        Self { fail: true }
    }
}

impl Localization for FakeLocalization {
    fn localizer(&self, language_tag: &str) -> AppResult<Arc<dyn Localizer>> {
        if self.fail {
            return Err(AppError::Internal(format!(
                "no message catalog for '{language_tag}'"
            )));
        }

        Ok(Arc::new(FakeLocalizer {
            language_tag: language_tag.to_owned(),
        }))
    }
}

/// User store keyed by email that records password hash updates.
#[derive(Default)]
pub(crate) struct FakeUserRepository {
    users: Mutex<Vec<UserAccount>>,
    password_hashes: Mutex<HashMap<UserId, String>>,
}

impl FakeUserRepository {
    pub(crate) async fn insert_user(&self, email: &str) -> AppResult<UserAccount> {
        let user = UserAccount {
            id: UserId::new(),
            email: EmailAddress::new(email)?,
            language_tag: "en".to_owned(),
        };
        self.users.lock().await.push(user.clone());
        Ok(user)
    }

    pub(crate) async fn password_hash(&self, user_id: UserId) -> Option<String> {
        self.password_hashes.lock().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserAccount>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        if !self.users.lock().await.iter().any(|user| user.id == user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        self.password_hashes
            .lock()
            .await
            .insert(user_id, password_hash.to_owned());
        Ok(())
    }
}

/// Reversible stand-in for a real password hasher.
pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }
}

/// Broker service holding user-broker links.
#[derive(Default)]
pub(crate) struct FakeBrokerService {
    links: Mutex<BTreeSet<(UserId, BrokerId)>>,
}

impl FakeBrokerService {
    pub(crate) async fn link(&self, user_id: UserId, broker_id: BrokerId) {
        self.links.lock().await.insert((user_id, broker_id));
    }

    pub(crate) async fn has_link(&self, user_id: UserId, broker_id: BrokerId) -> bool {
        self.links.lock().await.contains(&(user_id, broker_id))
    }
}

#[async_trait]
impl BrokerUserGateway for FakeBrokerService {
    async fn delete_broker_user(&self, user_id: UserId, broker_id: BrokerId) -> AppResult<()> {
        if self.links.lock().await.remove(&(user_id, broker_id)) {
            return Ok(());
        }

        Err(AppError::NotFound(format!(
            "user '{user_id}' is not linked to broker '{broker_id}'"
        )))
    }
}

/// Transaction service that can fail or stall on delete.
#[derive(Default)]
pub(crate) struct FakeTransactionService {
    transactions: Mutex<HashMap<(UserId, BrokerId), usize>>,
    fail: AtomicBool,
    stall: Option<Duration>,
}

impl FakeTransactionService {
    pub(crate) fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub(crate) fn stalling(stall: Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::default()
        }
    }

    pub(crate) async fn record(&self, user_id: UserId, broker_id: BrokerId, count: usize) {
        self.transactions
            .lock()
            .await
            .insert((user_id, broker_id), count);
    }

    pub(crate) async fn count(&self, user_id: UserId, broker_id: BrokerId) -> usize {
        self.transactions
            .lock()
            .await
            .get(&(user_id, broker_id))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl TransactionGateway for FakeTransactionService {
    async fn delete_transactions_for_broker_user(
        &self,
        user_id: UserId,
        broker_id: BrokerId,
    ) -> AppResult<()> {
        if let Some(stall) = self.stall {
            tokio::time::sleep(stall).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "transaction service returned status 503".to_owned(),
            ));
        }

        self.transactions.lock().await.remove(&(user_id, broker_id));
        Ok(())
    }
}
