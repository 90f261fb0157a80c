//! Shared mocks for enrollment handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::course::{Course, CourseTree, CourseUpdate, NewCourse, Price};
use crate::domain::enrollment::{Entitlement, PaymentEvent, PurchaseStatus};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::{Cpf, NewUser, Role, User};
use crate::ports::{
    CheckoutSession, CourseRepository, CreateCheckoutRequest, EntitlementStore, GatewayError,
    IdempotencyGuard, PaymentGateway, UserRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockUserRepository {
    users: Mutex<Vec<User>>,
}

impl MockUserRepository {
    pub fn empty() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user(id: i64) -> Self {
        Self {
            users: Mutex::new(vec![test_user(id)]),
        }
    }
}

pub fn test_user(id: i64) -> User {
    User {
        id: UserId::new(id),
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        password_hash: "$argon2id$stub".to_string(),
        role: Role::Student,
        state: "Brasília-DF".to_string(),
        about: String::new(),
        profile_picture: None,
        cpf: Cpf::new(format!("{:011}", id)).unwrap(),
        profession: None,
        created_at: Timestamp::from_unix_secs(1_700_000_000),
        updated_at: Timestamp::from_unix_secs(1_700_000_000),
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i64 + 1;
        let created = User {
            id: UserId::new(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            state: user.state,
            about: user.about,
            profile_picture: user.profile_picture,
            cpf: user.cpf,
            profession: user.profession,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.cpf.as_str() == cpf)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::UserNotFound, "User not found")),
        }
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::UserNotFound, "User not found")),
        }
    }

    async fn update_profile_picture(
        &self,
        id: UserId,
        profile_picture: Option<String>,
    ) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.profile_picture = profile_picture;
                Ok(user.clone())
            }
            None => Err(DomainError::new(ErrorCode::UserNotFound, "User not found")),
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Courses
// ════════════════════════════════════════════════════════════════════════════════

pub struct MockCourseRepository {
    courses: Mutex<Vec<Course>>,
}

impl MockCourseRepository {
    pub fn empty() -> Self {
        Self {
            courses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_course(id: i64, price: Price) -> Self {
        Self {
            courses: Mutex::new(vec![test_course(id, price)]),
        }
    }
}

pub fn test_course(id: i64, price: Price) -> Course {
    Course {
        id: CourseId::new(id),
        title: format!("Course {}", id),
        description: "Test course".to_string(),
        price,
        video_url: None,
        cover_image: None,
        parent_course_id: None,
        created_at: Timestamp::from_unix_secs(1_700_000_000),
        updated_at: Timestamp::from_unix_secs(1_700_000_000),
    }
}

#[async_trait]
impl CourseRepository for MockCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course, DomainError> {
        let mut courses = self.courses.lock().unwrap();
        let id = courses.len() as i64 + 1;
        let created = Course {
            id: CourseId::new(id),
            title: course.title,
            description: course.description,
            price: course.price,
            video_url: course.video_url,
            cover_image: course.cover_image,
            parent_course_id: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        courses.push(created.clone());
        Ok(created)
    }

    async fn create_with_subcourses(
        &self,
        course: NewCourse,
        _sub_courses: Vec<NewCourse>,
    ) -> Result<CourseTree, DomainError> {
        let created = self.create(course).await?;
        Ok(CourseTree {
            course: created,
            sub_courses: vec![],
        })
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_tree(&self, id: CourseId) -> Result<Option<CourseTree>, DomainError> {
        Ok(self.find_by_id(id).await?.map(|course| CourseTree {
            course,
            sub_courses: vec![],
        }))
    }

    async fn list(&self) -> Result<Vec<CourseTree>, DomainError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|course| CourseTree {
                course,
                sub_courses: vec![],
            })
            .collect())
    }

    async fn update(&self, id: CourseId, update: CourseUpdate) -> Result<Course, DomainError> {
        let mut courses = self.courses.lock().unwrap();
        match courses.iter_mut().find(|c| c.id == id) {
            Some(course) => {
                course.apply_update(update, Timestamp::now());
                Ok(course.clone())
            }
            None => Err(DomainError::new(
                ErrorCode::CourseNotFound,
                "Course not found",
            )),
        }
    }

    async fn delete(&self, id: CourseId) -> Result<(), DomainError> {
        let mut courses = self.courses.lock().unwrap();
        let before = courses.len();
        courses.retain(|c| c.id != id && c.parent_course_id != Some(id));
        if courses.len() == before {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                "Course not found",
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Entitlements
// ════════════════════════════════════════════════════════════════════════════════

/// In-memory entitlement store with the same upsert semantics as the
/// Postgres adapter, plus a switch to simulate storage outages.
pub struct InMemoryEntitlementStore {
    records: Mutex<HashMap<(i64, i64), Entitlement>>,
    fail_grants: AtomicBool,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_grants: AtomicBool::new(false),
        }
    }

    pub fn set_fail_grants(&self, fail: bool) {
        self.fail_grants.store(fail, Ordering::SeqCst);
    }

    pub fn approved_count(&self) -> usize {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.is_approved())
            .count()
    }
}

impl Default for InMemoryEntitlementStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn grant(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: Option<&str>,
    ) -> Result<Entitlement, DomainError> {
        if self.fail_grants.load(Ordering::SeqCst) {
            return Err(DomainError::new(ErrorCode::DatabaseError, "store offline"));
        }

        let mut records = self.records.lock().unwrap();
        let key = (user_id.as_i64(), course_id.as_i64());
        let now = Timestamp::now();

        let entitlement = records
            .entry(key)
            .and_modify(|e| {
                if e.status != PurchaseStatus::Approved {
                    e.status = PurchaseStatus::Approved;
                    e.updated_at = now;
                }
                if e.external_reference.is_none() {
                    e.external_reference = external_reference.map(str::to_string);
                }
            })
            .or_insert_with(|| Entitlement {
                user_id,
                course_id,
                status: PurchaseStatus::Approved,
                external_reference: external_reference.map(str::to_string),
                created_at: now,
                updated_at: now,
            });

        Ok(entitlement.clone())
    }

    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.remove(&(user_id.as_i64(), course_id.as_i64())) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::EntitlementNotFound,
                "Entitlement not found",
            )),
        }
    }

    async fn has(&self, user_id: UserId, course_id: CourseId) -> Result<bool, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(user_id.as_i64(), course_id.as_i64()))
            .map(Entitlement::is_approved)
            .unwrap_or(false))
    }

    async fn find(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(user_id.as_i64(), course_id.as_i64()))
            .cloned())
    }

    async fn mark_pending(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: &str,
    ) -> Result<Entitlement, DomainError> {
        let mut records = self.records.lock().unwrap();
        let key = (user_id.as_i64(), course_id.as_i64());
        let now = Timestamp::now();

        let entitlement = records
            .entry(key)
            .and_modify(|e| {
                if e.status != PurchaseStatus::Approved {
                    e.status = PurchaseStatus::Pending;
                    e.external_reference = Some(external_reference.to_string());
                    e.updated_at = now;
                }
            })
            .or_insert_with(|| Entitlement {
                user_id,
                course_id,
                status: PurchaseStatus::Pending,
                external_reference: Some(external_reference.to_string()),
                created_at: now,
                updated_at: now,
            });

        Ok(entitlement.clone())
    }

    async fn mark_failed(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError> {
        let mut records = self.records.lock().unwrap();
        let key = (user_id.as_i64(), course_id.as_i64());

        match records.get_mut(&key) {
            Some(e) if e.status != PurchaseStatus::Approved => {
                e.status = PurchaseStatus::Failed;
                e.updated_at = Timestamp::now();
                Ok(Some(e.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Entitlement>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Idempotency guard
// ════════════════════════════════════════════════════════════════════════════════

/// Set-backed guard with the atomic claim semantics of the Redis adapter.
pub struct InMemoryGuard {
    claims: Mutex<std::collections::HashSet<String>>,
}

impl InMemoryGuard {
    pub fn new() -> Self {
        Self {
            claims: Mutex::new(std::collections::HashSet::new()),
        }
    }
}

impl Default for InMemoryGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdempotencyGuard for InMemoryGuard {
    async fn claim(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.claims.lock().unwrap().insert(key.to_string()))
    }

    async fn is_claimed(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.claims.lock().unwrap().contains(key))
    }

    async fn release(&self, key: &str) -> Result<(), DomainError> {
        self.claims.lock().unwrap().remove(key);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment gateway
// ════════════════════════════════════════════════════════════════════════════════

enum GatewayBehavior {
    CheckoutOk { session_id: String, url: String },
    CheckoutFailing,
    WebhookEvent(Box<PaymentEvent>),
    WebhookInvalid,
}

pub struct MockGateway {
    behavior: GatewayBehavior,
}

impl MockGateway {
    pub fn checkout_ok(session_id: &str, url: &str) -> Self {
        Self {
            behavior: GatewayBehavior::CheckoutOk {
                session_id: session_id.to_string(),
                url: url.to_string(),
            },
        }
    }

    pub fn checkout_failing() -> Self {
        Self {
            behavior: GatewayBehavior::CheckoutFailing,
        }
    }

    pub fn webhook_event(event: PaymentEvent) -> Self {
        Self {
            behavior: GatewayBehavior::WebhookEvent(Box::new(event)),
        }
    }

    pub fn webhook_invalid() -> Self {
        Self {
            behavior: GatewayBehavior::WebhookInvalid,
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout(
        &self,
        _request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        match &self.behavior {
            GatewayBehavior::CheckoutOk { session_id, url } => Ok(CheckoutSession {
                id: session_id.clone(),
                url: url.clone(),
            }),
            _ => Err(GatewayError::network("connection timed out")),
        }
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<PaymentEvent, GatewayError> {
        match &self.behavior {
            GatewayBehavior::WebhookEvent(event) => Ok((**event).clone()),
            _ => Err(GatewayError::invalid_webhook("signature mismatch")),
        }
    }
}
