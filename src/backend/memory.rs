/// In-process reference backend
///
/// Implements the full port against process-local state, enforcing the same
/// server-side rules the hosted backends enforce: credential checks,
/// duplicate registration, role-scoped booking lists, the status state
/// machine with terminal-state rejection, price capture at creation, the
/// unique appointment slot, staff-only deletion, and atomic profile upsert.
/// The integration tests run against it; it also works for embedding and
/// prototyping without a server.
use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AddToCartRequest, AuthSession, AvailabilityQuery, AvailabilityRequest, Booking,
    BookingRequest, BookingStatus, BookingUpdate, Cart, CartItem, CreditTopUp, Equipment,
    Profile, ProfileUpdate, RegistrationRequest, Role, Service, ServiceAvailability, TopUpStatus,
    User, UserSummary,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<StoredUser>,
    sessions: HashMap<String, String>,
    services: Vec<Service>,
    bookings: Vec<Booking>,
    profiles: HashMap<String, Profile>,
    cart_items: HashMap<String, Vec<CartItem>>,
    cart_meta: HashMap<String, (i64, chrono::DateTime<Utc>)>,
    equipment: Vec<Equipment>,
    availability: Vec<ServiceAvailability>,
    topups: HashMap<String, Vec<CreditTopUp>>,
    next_id: i64,
    token: Option<String>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn authed_user(&self) -> ClientResult<User> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ClientError::Authentication("Not signed in".to_string()))?;
        let user_id = self
            .sessions
            .get(token)
            .ok_or_else(|| ClientError::Authentication("Invalid or expired token".to_string()))?;
        self.users
            .iter()
            .find(|stored| &stored.user.id == user_id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| ClientError::Authentication("Invalid or expired token".to_string()))
    }

    fn open_session(&mut self, user_id: &str) -> (String, String) {
        let access = Uuid::new_v4().to_string();
        let refresh = Uuid::new_v4().to_string();
        self.sessions.insert(access.clone(), user_id.to_string());
        (access, refresh)
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

fn line_total(price: Decimal, quantity: u32, use_new_equipment: bool, surcharge: Decimal) -> Decimal {
    let quantity = Decimal::from(quantity);
    let base = price * quantity;
    if use_new_equipment {
        base + surcharge * quantity
    } else {
        base
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog service
    pub fn add_service(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        duration_minutes: u32,
    ) -> Service {
        let mut state = self.state.write();
        let service = Service {
            id: state.next_id(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            duration_minutes,
            duration_display: None,
            is_active: true,
        };
        state.services.push(service.clone());
        service
    }

    /// Change a catalog price after the fact (bookings must not follow it)
    pub fn set_service_price(&self, service_id: i64, price: Decimal) {
        let mut state = self.state.write();
        if let Some(service) = state.services.iter_mut().find(|s| s.id == service_id) {
            service.price = price;
        }
    }

    pub fn set_service_active(&self, service_id: i64, is_active: bool) {
        let mut state = self.state.write();
        if let Some(service) = state.services.iter_mut().find(|s| s.id == service_id) {
            service.is_active = is_active;
        }
    }

    /// Seed an account directly, bypassing registration (e.g. staff users)
    pub fn add_user(&self, username: &str, email: &str, password: &str, role: Role) -> User {
        let mut state = self.state.write();
        let user = User {
            id: state.next_id().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            gender: None,
            avatar_url: None,
            role,
            created_at: Utc::now(),
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    pub fn add_equipment(&self, name: &str, surcharge: Decimal) -> Equipment {
        let mut state = self.state.write();
        let equipment = Equipment {
            id: state.next_id(),
            name: name.to_string(),
            description: String::new(),
            surcharge,
            is_new: true,
            services: Vec::new(),
            created_at: Utc::now(),
        };
        state.equipment.push(equipment.clone());
        equipment
    }

    pub fn add_availability(
        &self,
        service_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        capacity: u32,
        is_home_service: bool,
    ) -> ClientResult<ServiceAvailability> {
        let mut state = self.state.write();
        let service = state
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Service not found".to_string()))?;
        let window = ServiceAvailability {
            id: state.next_id(),
            service,
            date,
            start_time,
            end_time,
            capacity,
            booked_count: 0,
            is_home_service,
            is_available: capacity > 0,
            remaining_slots: capacity,
            created_at: Utc::now(),
        };
        state.availability.push(window.clone());
        Ok(window)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn set_token(&self, token: Option<String>) {
        self.state.write().token = token;
    }

    async fn register(&self, request: &RegistrationRequest) -> ClientResult<AuthSession> {
        let mut state = self.state.write();

        if request.password != request.password_confirm {
            return Err(ClientError::Validation("Passwords don't match".to_string()));
        }
        if state.users.iter().any(|s| s.user.email == request.email) {
            return Err(ClientError::Conflict("Email already registered".to_string()));
        }
        if state.users.iter().any(|s| s.user.username == request.username) {
            return Err(ClientError::Conflict(format!(
                "Username {} already taken",
                request.username
            )));
        }

        let user = User {
            id: state.next_id().to_string(),
            username: request.username.clone(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            phone: request.phone.clone(),
            gender: request.gender,
            avatar_url: None,
            role: Role::Customer,
            created_at: Utc::now(),
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password: request.password.clone(),
        });

        let (access, refresh) = state.open_session(&user.id);
        Ok(AuthSession {
            user,
            access,
            refresh,
        })
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let mut state = self.state.write();

        let user = state
            .users
            .iter()
            .find(|s| s.user.email == email && s.password == password)
            .map(|s| s.user.clone())
            .ok_or_else(|| ClientError::Authentication("Invalid credentials".to_string()))?;

        let (access, refresh) = state.open_session(&user.id);
        Ok(AuthSession {
            user,
            access,
            refresh,
        })
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.state.read().authed_user()
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        let mut state = self.state.write();
        let user_id = state.authed_user()?.id;

        let stored = state
            .users
            .iter_mut()
            .find(|s| s.user.id == user_id)
            .ok_or_else(|| ClientError::NotFound("User".to_string()))?;

        if let Some(ref first_name) = update.first_name {
            stored.user.first_name = first_name.clone();
        }
        if let Some(ref last_name) = update.last_name {
            stored.user.last_name = last_name.clone();
        }
        if let Some(ref phone) = update.phone {
            stored.user.phone = Some(phone.clone());
        }
        if let Some(gender) = update.gender {
            stored.user.gender = Some(gender);
        }
        if let Some(ref avatar_url) = update.avatar_url {
            stored.user.avatar_url = avatar_url.clone();
        }
        Ok(stored.user.clone())
    }

    async fn list_services(&self) -> ClientResult<Vec<Service>> {
        let state = self.state.read();
        let mut services: Vec<Service> = state
            .services
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        let state = self.state.read();
        let user = state.authed_user()?;

        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| user.role.is_staff() || b.is_owned_by(&user.id))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.appointment_date, b.appointment_time));
        Ok(bookings)
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let service = state
            .services
            .iter()
            .find(|s| s.id == request.service_id && s.is_active)
            .cloned()
            .ok_or_else(|| ClientError::Validation("Invalid service selected".to_string()))?;

        // One booking per slot
        if state.bookings.iter().any(|b| {
            b.appointment_date == request.appointment_date
                && b.appointment_time == request.appointment_time
        }) {
            return Err(ClientError::Conflict(
                "This appointment slot is already taken".to_string(),
            ));
        }

        let now = Utc::now();
        let booking = Booking {
            id: state.next_id(),
            user: Some(UserSummary {
                id: user.id.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                phone: user.phone.clone(),
            }),
            service_name: service.name.clone(),
            service_price: service.price,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
            status: BookingStatus::Pending,
            notes: request.notes.clone(),
            is_vip: Some(false),
            is_home_service: Some(false),
            use_new_equipment: Some(false),
            created_at: now,
            updated_at: Some(now),
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, id: i64, update: &BookingUpdate) -> ClientResult<Booking> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let index = state
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ClientError::NotFound("Booking".to_string()))?;
        let current = state.bookings[index].clone();

        let wants_flags = update.is_vip.is_some()
            || update.is_home_service.is_some()
            || update.use_new_equipment.is_some();

        if user.role == Role::Customer {
            if !current.is_owned_by(&user.id) {
                return Err(ClientError::Authorization(
                    "You can only modify your own bookings".to_string(),
                ));
            }
            if current.status != BookingStatus::Pending {
                return Err(ClientError::Validation(
                    "You can only cancel pending bookings".to_string(),
                ));
            }
            if wants_flags {
                return Err(ClientError::Authorization(
                    "Only staff can set booking flags".to_string(),
                ));
            }
            if let Some(next) = update.status {
                if next != BookingStatus::Cancelled {
                    return Err(ClientError::Validation(
                        "You can only cancel bookings".to_string(),
                    ));
                }
            }
        } else if let Some(next) = update.status {
            if current.status.is_terminal() {
                return Err(ClientError::Validation(format!(
                    "Cannot modify a {} booking",
                    current.status.as_str()
                )));
            }
            if !current.status.can_transition(next, user.role, false) {
                return Err(ClientError::Validation(format!(
                    "Cannot change status from {} to {}",
                    current.status.as_str(),
                    next.as_str()
                )));
            }
        }

        let booking = &mut state.bookings[index];
        if let Some(next) = update.status {
            booking.status = next;
        }
        if let Some(ref notes) = update.notes {
            booking.notes = Some(notes.clone());
        }
        if let Some(is_vip) = update.is_vip {
            booking.is_vip = Some(is_vip);
        }
        if let Some(is_home) = update.is_home_service {
            booking.is_home_service = Some(is_home);
        }
        if let Some(new_equipment) = update.use_new_equipment {
            booking.use_new_equipment = Some(new_equipment);
        }
        booking.updated_at = Some(Utc::now());
        Ok(booking.clone())
    }

    async fn delete_booking(&self, id: i64) -> ClientResult<()> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        if !user.role.is_staff() {
            return Err(ClientError::Authorization(
                "Only staff can delete bookings".to_string(),
            ));
        }
        let index = state
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ClientError::NotFound("Booking".to_string()))?;
        state.bookings.remove(index);
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> ClientResult<Option<Profile>> {
        let state = self.state.read();
        state.authed_user()?;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        // Upsert under one lock: a concurrent double-save cannot create two rows
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let profile = state
            .profiles
            .entry(user.id.clone())
            .or_insert_with(|| Profile {
                user_id: user.id.clone(),
                first_name: String::new(),
                last_name: String::new(),
                phone: None,
                avatar_url: None,
                gender: None,
            });

        if let Some(ref first_name) = update.first_name {
            profile.first_name = first_name.clone();
        }
        if let Some(ref last_name) = update.last_name {
            profile.last_name = last_name.clone();
        }
        if let Some(ref phone) = update.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(gender) = update.gender {
            profile.gender = Some(gender);
        }
        if let Some(ref avatar_url) = update.avatar_url {
            profile.avatar_url = avatar_url.clone();
        }
        Ok(profile.clone())
    }

    async fn fetch_cart(&self) -> ClientResult<Cart> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let (id, created_at) = match state.cart_meta.get(&user.id).copied() {
            Some(meta) => meta,
            None => {
                let meta = (state.next_id(), Utc::now());
                state.cart_meta.insert(user.id.clone(), meta);
                meta
            }
        };
        let items = state.cart_items.get(&user.id).cloned().unwrap_or_default();
        let total_amount = items.iter().map(|i| i.total_price).sum();

        Ok(Cart {
            id,
            items_count: items.len() as u32,
            items,
            total_amount,
            created_at,
            updated_at: Some(Utc::now()),
        })
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> ClientResult<CartItem> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let service = state
            .services
            .iter()
            .find(|s| s.id == request.service_id && s.is_active)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Service not found".to_string()))?;

        let item_id = state.next_id();
        let items = state.cart_items.entry(user.id).or_default();

        // Same (service, equipment choice) line: bump the quantity
        if let Some(item) = items.iter_mut().find(|i| {
            i.service.id == request.service_id && i.use_new_equipment == request.use_new_equipment
        }) {
            item.quantity += request.quantity;
            item.total_price = line_total(
                item.service.price,
                item.quantity,
                item.use_new_equipment,
                item.equipment_surcharge,
            );
            return Ok(item.clone());
        }

        let item = CartItem {
            id: item_id,
            total_price: line_total(
                service.price,
                request.quantity,
                request.use_new_equipment,
                request.equipment_surcharge,
            ),
            service,
            quantity: request.quantity,
            use_new_equipment: request.use_new_equipment,
            equipment_surcharge: request.equipment_surcharge,
            created_at: Utc::now(),
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn remove_cart_item(&self, item_id: i64) -> ClientResult<()> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        let items = state.cart_items.entry(user.id).or_default();
        let index = items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| ClientError::NotFound("Cart item".to_string()))?;
        items.remove(index);
        Ok(())
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        let mut state = self.state.write();
        let user = state.authed_user()?;
        state.cart_items.remove(&user.id);
        Ok(())
    }

    async fn list_equipment(&self) -> ClientResult<Vec<Equipment>> {
        let state = self.state.read();
        Ok(state
            .equipment
            .iter()
            .filter(|e| e.is_new)
            .cloned()
            .collect())
    }

    async fn list_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> ClientResult<Vec<ServiceAvailability>> {
        let state = self.state.read();
        Ok(state
            .availability
            .iter()
            .filter(|w| w.booked_count < w.capacity)
            .filter(|w| query.service_id.map_or(true, |id| w.service.id == id))
            .filter(|w| query.date.map_or(true, |date| w.date == date))
            .filter(|w| {
                query
                    .is_home_service
                    .map_or(true, |home| w.is_home_service == home)
            })
            .cloned()
            .collect())
    }

    async fn create_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> ClientResult<ServiceAvailability> {
        {
            let state = self.state.read();
            state.authed_user()?;
        }
        self.add_availability(
            request.service_id,
            request.date,
            request.start_time,
            request.end_time,
            request.capacity,
            request.is_home_service,
        )
    }

    async fn list_topups(&self) -> ClientResult<Vec<CreditTopUp>> {
        let state = self.state.read();
        let user = state.authed_user()?;

        let mut topups = state.topups.get(&user.id).cloned().unwrap_or_default();
        topups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(topups)
    }

    async fn create_topup(&self, amount: Decimal) -> ClientResult<CreditTopUp> {
        let mut state = self.state.write();
        let user = state.authed_user()?;

        if amount <= Decimal::ZERO {
            return Err(ClientError::Validation(
                "Top-up amount must be positive".to_string(),
            ));
        }

        let topup = CreditTopUp {
            id: state.next_id(),
            amount,
            status: TopUpStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        state.topups.entry(user.id).or_default().push(topup.clone());
        Ok(topup)
    }
}
