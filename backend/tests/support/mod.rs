//! Shared helpers for behavioural tests.
//!
//! [`InMemorySocial`] implements the account, friendship and notification
//! repositories over one mutex-guarded store so a single write can be
//! observed through every port, mirroring the transactional PostgreSQL
//! adapters.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use shelfmate::domain::ports::{
    AccountRepository, AccountRepositoryError, FriendshipRepository, FriendshipRepositoryError,
    NewAccount, NotificationRepository, NotificationRepositoryError, StoredCredentials,
};
use shelfmate::domain::{
    EmailAddress, FriendRequest, Friendship, FriendshipId, FriendshipStatus, NewNotification,
    Notification, NotificationId, NotificationLimit, Profile, ProfileUpdate, SearchQuery, UserId,
    Username,
};

#[derive(Default)]
struct Store {
    profiles: Vec<Profile>,
    friendships: Vec<Friendship>,
    notifications: Vec<Notification>,
}

/// In-memory stand-in for the social tables.
#[derive(Clone, Default)]
pub struct InMemorySocial {
    store: Arc<Mutex<Store>>,
}

impl InMemorySocial {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store poisoned")
    }

    /// Register a reader and return their profile.
    pub fn add_reader(&self, email: &str, full_name: &str) -> Profile {
        let mut profile = Profile::new(
            UserId::random(),
            EmailAddress::new(email).expect("valid email"),
            Utc::now(),
        );
        profile.full_name = Some(full_name.to_owned());
        self.lock().profiles.push(profile.clone());
        profile
    }

    /// Every notification stored for `user`, in insertion order.
    pub fn notifications_for(&self, user: &UserId) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| &n.user_id == user)
            .cloned()
            .collect()
    }

    pub fn friendship_count(&self) -> usize {
        self.lock().friendships.len()
    }

    fn profile(store: &Store, id: &UserId) -> Option<Profile> {
        store.profiles.iter().find(|p| &p.id == id).cloned()
    }

    fn push_notification(store: &mut Store, notification: &NewNotification) {
        store.notifications.push(Notification {
            id: NotificationId::random(),
            user_id: notification.user_id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            related_user_id: notification.related_user_id.clone(),
            related_book_id: notification.related_book_id,
            is_read: false,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl AccountRepository for InMemorySocial {
    async fn create(&self, account: &NewAccount) -> Result<Profile, AccountRepositoryError> {
        let mut store = self.lock();
        if store.profiles.iter().any(|p| p.email == account.email) {
            return Err(AccountRepositoryError::duplicate_email(
                account.email.to_string(),
            ));
        }
        let mut profile = Profile::new(account.id.clone(), account.email.clone(), Utc::now());
        profile.full_name.clone_from(&account.full_name);
        store.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_credentials(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, AccountRepositoryError> {
        Ok(Self::profile(&self.lock(), id))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, AccountRepositoryError> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.email.local_part() == username.as_ref())
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, AccountRepositoryError> {
        let mut store = self.lock();
        let Some(profile) = store.profiles.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        profile.full_name.clone_from(&update.full_name);
        profile.bio.clone_from(&update.bio);
        profile.location.clone_from(&update.location);
        profile.website.clone_from(&update.website);
        profile.avatar_url.clone_from(&update.avatar_url);
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }

    async fn search(
        &self,
        exclude: &UserId,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Profile>, AccountRepositoryError> {
        let needle = query.as_str().to_lowercase();
        let limit = usize::try_from(limit).unwrap_or_default();
        Ok(self
            .lock()
            .profiles
            .iter()
            .filter(|p| &p.id != exclude)
            .filter(|p| {
                p.email.as_ref().to_lowercase().contains(&needle)
                    || p.full_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FriendshipRepository for InMemorySocial {
    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        Ok(self
            .lock()
            .friendships
            .iter()
            .find(|f| f.involves(a) && f.involves(b))
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: &FriendshipId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        Ok(self.lock().friendships.iter().find(|f| &f.id == id).cloned())
    }

    async fn create_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        notification: &NewNotification,
    ) -> Result<Friendship, FriendshipRepositoryError> {
        let mut store = self.lock();
        if store
            .friendships
            .iter()
            .any(|f| f.involves(requester) && f.involves(addressee))
        {
            return Err(FriendshipRepositoryError::already_exists(
                "pair already linked",
            ));
        }
        let now = Utc::now();
        let row = Friendship {
            id: FriendshipId::random(),
            requester_id: requester.clone(),
            addressee_id: addressee.clone(),
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        store.friendships.push(row.clone());
        Self::push_notification(&mut store, notification);
        Ok(row)
    }

    async fn accept(
        &self,
        id: &FriendshipId,
        notification: &NewNotification,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let mut store = self.lock();
        let Some(row) = store
            .friendships
            .iter_mut()
            .find(|f| &f.id == id && f.status == FriendshipStatus::Pending)
        else {
            return Ok(None);
        };
        row.status = FriendshipStatus::Accepted;
        row.updated_at = Utc::now();
        let accepted = row.clone();
        Self::push_notification(&mut store, notification);
        Ok(Some(accepted))
    }

    async fn delete(&self, id: &FriendshipId) -> Result<bool, FriendshipRepositoryError> {
        let mut store = self.lock();
        let before = store.friendships.len();
        store.friendships.retain(|f| &f.id != id);
        Ok(store.friendships.len() < before)
    }

    async fn list_friends(
        &self,
        user: &UserId,
    ) -> Result<Vec<Profile>, FriendshipRepositoryError> {
        let store = self.lock();
        Ok(store
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .filter_map(|f| f.other_party(user))
            .filter_map(|other| Self::profile(&store, other))
            .collect())
    }

    async fn list_incoming(
        &self,
        user: &UserId,
    ) -> Result<Vec<FriendRequest>, FriendshipRepositoryError> {
        let store = self.lock();
        Ok(store
            .friendships
            .iter()
            .rev()
            .filter(|f| f.status == FriendshipStatus::Pending && &f.addressee_id == user)
            .filter_map(|f| {
                Self::profile(&store, &f.requester_id).map(|requester| FriendRequest {
                    id: f.id,
                    created_at: f.created_at,
                    requester,
                })
            })
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemorySocial {
    async fn list(
        &self,
        user: &UserId,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let limit = usize::try_from(limit.get()).unwrap_or(usize::MAX);
        Ok(self
            .lock()
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == user)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user: &UserId) -> Result<i64, NotificationRepositoryError> {
        let count = self
            .lock()
            .notifications
            .iter()
            .filter(|n| &n.user_id == user && !n.is_read)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        user: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut store = self.lock();
        match store
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.user_id == user)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut updated = 0;
        for notification in self
            .lock()
            .notifications
            .iter_mut()
            .filter(|n| &n.user_id == user && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}
