//! The post registry - the only writer of post state.
//!
//! Every mutation reads a post, applies one workflow step in memory and
//! commits it with a compare-and-swap on the post's version, so two racing
//! writers on the same post can never both win.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use uuid::Uuid;

use crate::calendar::{CalendarMonth, YearMonth};
use crate::domain::{NewPost, Operation, Post, PostPatch};
use crate::error::DomainError;
use crate::ports::{ClientDirectory, Clock, PostEvent, PostEventSink, PostRepository};
use crate::query::{self, ApprovalQueue, ClientNames, PostQuery, StatusCounts, StatusFilter};

/// Owned registry of posts with its collaborators injected.
#[derive(Clone)]
pub struct PostRegistry {
    repo: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    clients: Arc<dyn ClientDirectory>,
    events: Arc<dyn PostEventSink>,
    calendar_offset: FixedOffset,
}

impl PostRegistry {
    pub fn new(
        repo: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
        clients: Arc<dyn ClientDirectory>,
        events: Arc<dyn PostEventSink>,
    ) -> Self {
        Self {
            repo,
            clock,
            clients,
            events,
            calendar_offset: Utc.fix(),
        }
    }

    /// Offset in which calendar days are evaluated.
    pub fn with_calendar_offset(mut self, offset: FixedOffset) -> Self {
        self.calendar_offset = offset;
        self
    }

    pub fn calendar_offset(&self) -> FixedOffset {
        self.calendar_offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn emit(&self, event: PostEvent) {
        if let Err(e) = self.events.publish(event.clone()).await {
            tracing::warn!(post_id = %event.post_id(), error = %e, "Failed to deliver post event");
        }
    }

    async fn load(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::from_repo(e, id))?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Read, change, compare-and-swap. `change` returns `false` for an
    /// idempotent no-op, in which case nothing is written.
    async fn mutate<F>(&self, id: Uuid, op: Operation, change: F) -> Result<Post, DomainError>
    where
        F: FnOnce(&mut Post, DateTime<Utc>) -> Result<bool, DomainError>,
    {
        let mut post = self.load(id).await?;
        let from = post.status();

        let changed = change(&mut post, self.clock.now()).inspect_err(|e| {
            tracing::debug!(post_id = %id, operation = %op, error = %e, "Operation refused");
        })?;
        if !changed {
            return Ok(post);
        }

        let committed = self.repo.update(post).await.map_err(|e| {
            let err = DomainError::from_repo(e, id);
            if let DomainError::Conflict { .. } = err {
                tracing::warn!(post_id = %id, operation = %op, "Lost a concurrent update");
            }
            err
        })?;

        let to = committed.status();
        tracing::info!(
            post_id = %id,
            operation = %op,
            from = %from,
            to = %to,
            version = committed.version(),
            "Post updated"
        );

        let event = if from != to {
            PostEvent::StatusChanged { id, from, to }
        } else if op == Operation::Comment {
            PostEvent::Commented {
                id,
                comment_count: committed.comments().len(),
            }
        } else {
            PostEvent::Updated {
                id,
                version: committed.version(),
            }
        };
        self.emit(event).await;

        Ok(committed)
    }

    // ---- Registry ----

    /// Draft a new post.
    pub async fn create(&self, draft: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(draft, self.clock.now())?;
        let id = post.id();
        let stored = self
            .repo
            .insert(post)
            .await
            .map_err(|e| DomainError::from_repo(e, id))?;

        tracing::info!(post_id = %id, client = %stored.client_ref(), "Post drafted");
        self.emit(PostEvent::Created { id }).await;
        Ok(stored)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.load(id).await
    }

    /// Change title, content, networks or planned time.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Update, |post, now| {
            post.apply(patch, now).map(|()| true)
        })
        .await
    }

    /// Snapshot of every post in insertion order.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        self.repo
            .list()
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    pub async fn add_comment(&self, id: Uuid, text: String) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Comment, |post, now| {
            post.add_comment(text, now).map(|()| true)
        })
        .await
    }

    // ---- Workflow ----

    pub async fn submit_for_approval(&self, id: Uuid) -> Result<Post, DomainError> {
        self.mutate(id, Operation::SubmitForApproval, |post, now| {
            post.submit_for_approval(now).map(|()| true)
        })
        .await
    }

    pub async fn approve(&self, id: Uuid) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Approve, |post, now| {
            post.approve(now).map(|()| true)
        })
        .await
    }

    pub async fn reject(&self, id: Uuid, reason: String) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Reject, |post, now| {
            post.reject(reason, now).map(|()| true)
        })
        .await
    }

    pub async fn schedule(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Schedule, |post, now| {
            post.schedule(at, now).map(|()| true)
        })
        .await
    }

    /// Publish a scheduled post. Publishing an already published post
    /// returns it unchanged.
    pub async fn publish(&self, id: Uuid) -> Result<Post, DomainError> {
        self.mutate(id, Operation::Publish, |post, now| post.publish(now))
            .await
    }

    // ---- Publisher callbacks ----

    /// The external publisher reports the post went out at `at`.
    pub async fn mark_published(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, DomainError> {
        self.mutate(id, Operation::MarkPublished, |post, now| {
            post.confirm_published(at, now)
        })
        .await
    }

    /// The external publisher gave up on a scheduled post.
    pub async fn mark_publish_failed(&self, id: Uuid, reason: String) -> Result<Post, DomainError> {
        self.mutate(id, Operation::MarkPublishFailed, |post, now| {
            post.fail_publish(reason, now).map(|()| true)
        })
        .await
    }

    // ---- Queries ----

    async fn client_names(&self, posts: &[Post]) -> ClientNames {
        let refs: BTreeSet<&str> = posts.iter().map(Post::client_ref).collect();
        let mut names = ClientNames::new();
        for client_ref in refs {
            if let Some(name) = self.clients.display_name(client_ref).await {
                names.insert(client_ref.to_string(), name);
            }
        }
        names
    }

    /// Run a composite query over a fresh snapshot.
    pub async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        let posts = self.list().await?;
        let names = match query.term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => self.client_names(&posts).await,
            _ => ClientNames::new(),
        };
        Ok(query.apply(posts, self.calendar_offset, &names))
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<Post>, DomainError> {
        let posts = self.list().await?;
        Ok(query::by_date(&posts, date, self.calendar_offset))
    }

    pub async fn by_status(&self, filter: StatusFilter) -> Result<Vec<Post>, DomainError> {
        let posts = self.list().await?;
        Ok(query::by_status(&posts, filter))
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Post>, DomainError> {
        self.query(&PostQuery {
            term: Some(term.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn status_counts(&self) -> Result<StatusCounts, DomainError> {
        let posts = self.list().await?;
        Ok(StatusCounts::tally(&posts))
    }

    pub async fn approval_queue(&self) -> Result<ApprovalQueue, DomainError> {
        let posts = self.list().await?;
        Ok(ApprovalQueue::build(&posts))
    }

    pub async fn calendar(&self, month: YearMonth) -> Result<CalendarMonth, DomainError> {
        let posts = self.list().await?;
        Ok(CalendarMonth::project(month, &posts, self.calendar_offset))
    }

    /// Scheduled posts whose time has come.
    pub async fn due_for_publishing(&self) -> Result<Vec<Post>, DomainError> {
        let posts = self.list().await?;
        Ok(query::due_for_publishing(&posts, self.clock.now()))
    }

    /// Emit a [`PostEvent::Due`] for every due post. Returns how many.
    pub async fn announce_due(&self) -> Result<usize, DomainError> {
        let due = self.due_for_publishing().await?;
        for post in &due {
            if let Some(scheduled_for) = post.scheduled_for() {
                self.emit(PostEvent::Due {
                    id: post.id(),
                    scheduled_for,
                })
                .await;
            }
        }
        if !due.is_empty() {
            tracing::info!(count = due.len(), "Announced due posts");
        }
        Ok(due.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    use crate::domain::{ContentType, Network, PostStatus};
    use crate::error::RepoError;
    use crate::ports::EventError;

    #[derive(Default)]
    struct VecRepository {
        posts: Mutex<Vec<Post>>,
    }

    #[async_trait]
    impl PostRepository for VecRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            let posts = self.posts.lock().unwrap();
            Ok(posts.iter().find(|p| p.id() == id).cloned())
        }

        async fn insert(&self, post: Post) -> Result<Post, RepoError> {
            self.posts.lock().unwrap().push(post.clone());
            Ok(post)
        }

        async fn update(&self, post: Post) -> Result<Post, RepoError> {
            let mut posts = self.posts.lock().unwrap();
            let slot = posts
                .iter_mut()
                .find(|p| p.id() == post.id())
                .ok_or(RepoError::NotFound)?;
            if slot.version() != post.version() {
                return Err(RepoError::Conflict {
                    expected: post.version(),
                    actual: slot.version(),
                });
            }
            *slot = post.with_next_version();
            Ok(slot.clone())
        }

        async fn list(&self) -> Result<Vec<Post>, RepoError> {
            Ok(self.posts.lock().unwrap().clone())
        }
    }

    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    struct Names(HashMap<String, String>);

    #[async_trait]
    impl ClientDirectory for Names {
        async fn display_name(&self, client_ref: &str) -> Option<String> {
            self.0.get(client_ref).cloned()
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<PostEvent>>);

    #[async_trait]
    impl PostEventSink for Recorder {
        async fn publish(&self, event: PostEvent) -> Result<(), EventError> {
            self.0.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct Fixture {
        registry: PostRegistry,
        clock: Arc<TestClock>,
        events: Arc<Recorder>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(TestClock(Mutex::new(
            Utc.with_ymd_and_hms(2024, 1, 20, 9, 30, 0).unwrap(),
        )));
        let events = Arc::new(Recorder::default());
        let names = Names(HashMap::from([(
            "loja-fashion".to_string(),
            "Loja Fashion".to_string(),
        )]));
        let registry = PostRegistry::new(
            Arc::new(VecRepository::default()),
            clock.clone(),
            Arc::new(names),
            events.clone(),
        );
        Fixture {
            registry,
            clock,
            events,
        }
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            client_ref: "loja-fashion".to_string(),
            content: "Aproveite 50% de desconto".to_string(),
            content_type: ContentType::Image,
            networks: vec![Network::Instagram, Network::Facebook],
            scheduled_for: None,
            urgent: false,
        }
    }

    fn jan21(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 21, hour, 0, 0).unwrap()
    }

    async fn scheduled(f: &Fixture, title: &str, at: DateTime<Utc>) -> Post {
        let post = f.registry.create(new_post(title)).await.unwrap();
        f.registry.submit_for_approval(post.id()).await.unwrap();
        f.registry.approve(post.id()).await.unwrap();
        f.registry.schedule(post.id(), at).await.unwrap()
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let f = fixture();
        let post = scheduled(&f, "Promoção de Verão", jan21(14)).await;
        assert_eq!(post.status(), PostStatus::Scheduled);

        f.clock.advance(Duration::days(2));
        let published = f.registry.publish(post.id()).await.unwrap();

        assert_eq!(published.status(), PostStatus::Published);
        assert_eq!(published.scheduled_for(), Some(jan21(14)));
        assert_eq!(published.published_at(), Some(f.registry.now()));
        assert!(published.scheduled_for() <= published.published_at());
        assert_eq!(published.version(), 4);
    }

    #[tokio::test]
    async fn test_publish_twice_returns_same_timestamp() {
        let f = fixture();
        let post = scheduled(&f, "Flash Sale", jan21(20)).await;
        f.clock.advance(Duration::days(2));
        let first = f.registry.publish(post.id()).await.unwrap();

        f.clock.advance(Duration::hours(3));
        let second = f.registry.publish(post.id()).await.unwrap();

        assert_eq!(first.published_at(), second.published_at());
        assert_eq!(first.version(), second.version());
    }

    #[tokio::test]
    async fn test_approve_draft_is_invalid_state() {
        let f = fixture();
        let post = f.registry.create(new_post("Draft")).await.unwrap();
        let err = f.registry.approve(post.id()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidState {
                current: PostStatus::Draft,
                operation: Operation::Approve,
                target: Some(PostStatus::Approved),
            }
        ));
        assert_eq!(f.registry.get(post.id()).await.unwrap().version(), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let f = fixture();
        let id = Uuid::new_v4();
        assert!(matches!(
            f.registry.get(id).await,
            Err(DomainError::NotFound { id: missing, .. }) if missing == id
        ));
        assert!(matches!(
            f.registry.approve(id).await,
            Err(DomainError::NotFound { .. })
        ));
        let patch = PostPatch {
            title: Some("Novo título".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            f.registry.update(id, patch).await,
            Err(DomainError::NotFound { id: missing, .. }) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_empty_update_is_refused_without_a_write() {
        let f = fixture();
        let post = f.registry.create(new_post("Draft")).await.unwrap();

        assert!(matches!(
            f.registry.update(post.id(), PostPatch::default()).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(f.registry.get(post.id()).await.unwrap().version(), 0);
        assert_eq!(f.events.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_guard_failures_carry_states() {
        let f = fixture();
        let post = f.registry.create(new_post("Guarded")).await.unwrap();
        f.registry.submit_for_approval(post.id()).await.unwrap();

        let err = f
            .registry
            .reject(post.id(), " ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::GuardFailed {
                current: PostStatus::Pending,
                operation: Operation::Reject,
                target: Some(PostStatus::Rejected),
                ..
            }
        ));

        f.registry.approve(post.id()).await.unwrap();
        let past = f.registry.now() - Duration::hours(1);
        let err = f.registry.schedule(post.id(), past).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::GuardFailed {
                current: PostStatus::Approved,
                operation: Operation::Schedule,
                target: Some(PostStatus::Scheduled),
                ..
            }
        ));
        assert_eq!(
            f.registry.get(post.id()).await.unwrap().status(),
            PostStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_rejected_post_can_be_edited_and_resubmitted() {
        let f = fixture();
        let post = f.registry.create(new_post("Happy Hour")).await.unwrap();
        f.registry.submit_for_approval(post.id()).await.unwrap();
        f.registry
            .reject(post.id(), "Ajustar horário do vídeo".to_string())
            .await
            .unwrap();

        let patch = PostPatch {
            content: Some("Chopp por R$9,90".to_string()),
            ..Default::default()
        };
        f.registry.update(post.id(), patch).await.unwrap();
        let resubmitted = f.registry.submit_for_approval(post.id()).await.unwrap();

        assert_eq!(resubmitted.status(), PostStatus::Pending);
        assert_eq!(resubmitted.comments(), ["Ajustar horário do vídeo"]);
    }

    #[tokio::test]
    async fn test_publish_failure_records_reason() {
        let f = fixture();
        let post = scheduled(&f, "Serviços Premium", jan21(11)).await;
        let failed = f
            .registry
            .mark_publish_failed(post.id(), "token expired".to_string())
            .await
            .unwrap();
        assert_eq!(failed.status(), PostStatus::Rejected);
        assert_eq!(failed.comments(), ["publish failed: token expired"]);
        assert!(failed.published_at().is_none());
    }

    #[tokio::test]
    async fn test_mark_published_uses_reported_time() {
        let f = fixture();
        let post = scheduled(&f, "Consultoria", jan21(15)).await;
        let reported = jan21(15) + Duration::minutes(2);
        let published = f.registry.mark_published(post.id(), reported).await.unwrap();
        assert_eq!(published.published_at(), Some(reported));

        let again = f
            .registry
            .mark_published(post.id(), reported + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(again.published_at(), Some(reported));
    }

    #[tokio::test]
    async fn test_mark_published_before_schedule_is_refused() {
        let f = fixture();
        let post = scheduled(&f, "Consultoria", jan21(15)).await;
        let err = f
            .registry
            .mark_published(post.id(), jan21(14))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::GuardFailed {
                current: PostStatus::Scheduled,
                operation: Operation::MarkPublished,
                ..
            }
        ));
        let stored = f.registry.get(post.id()).await.unwrap();
        assert_eq!(stored.status(), PostStatus::Scheduled);
        assert!(stored.published_at().is_none());
    }

    #[tokio::test]
    async fn test_acknowledged_publish_is_final() {
        let f = fixture();
        let post = scheduled(&f, "Novidades", jan21(11)).await;
        f.registry.mark_published(post.id(), jan21(11)).await.unwrap();

        assert!(matches!(
            f.registry
                .mark_publish_failed(post.id(), "timeout".to_string())
                .await,
            Err(DomainError::InvalidState {
                current: PostStatus::Published,
                operation: Operation::MarkPublishFailed,
                target: Some(PostStatus::Rejected),
            })
        ));
        assert!(matches!(
            f.registry
                .add_comment(post.id(), "late note".to_string())
                .await,
            Err(DomainError::InvalidState {
                current: PostStatus::Published,
                operation: Operation::Comment,
                target: None,
            })
        ));

        let stored = f.registry.get(post.id()).await.unwrap();
        assert_eq!(stored.status(), PostStatus::Published);
        assert_eq!(stored.published_at(), Some(jan21(11)));
        assert!(stored.comments().is_empty());
    }

    #[tokio::test]
    async fn test_by_date_orders_posts() {
        let f = fixture();
        scheduled(&f, "afternoon", jan21(14)).await;
        scheduled(&f, "morning", jan21(9)).await;

        let posts = f
            .registry
            .by_date(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap())
            .await
            .unwrap();
        let times: Vec<_> = posts.iter().map(|p| p.scheduled_for().unwrap()).collect();
        assert_eq!(times, [jan21(9), jan21(14)]);
    }

    #[tokio::test]
    async fn test_search_resolves_client_names() {
        let f = fixture();
        let mut other = new_post("Dicas de Tecnologia");
        other.client_ref = "tech".to_string();
        f.registry.create(new_post("Promoção")).await.unwrap();
        f.registry.create(other).await.unwrap();

        let found = f.registry.search("fashion").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Promoção");
    }

    #[tokio::test]
    async fn test_events_follow_committed_changes() {
        let f = fixture();
        let post = f.registry.create(new_post("Receita")).await.unwrap();
        f.registry
            .add_comment(post.id(), "Adicionar logo".to_string())
            .await
            .unwrap();
        f.registry.submit_for_approval(post.id()).await.unwrap();
        // Refused operations emit nothing.
        let _ = f.registry.schedule(post.id(), jan21(10)).await;

        let events = f.events.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                PostEvent::Created { id: post.id() },
                PostEvent::Commented {
                    id: post.id(),
                    comment_count: 1
                },
                PostEvent::StatusChanged {
                    id: post.id(),
                    from: PostStatus::Draft,
                    to: PostStatus::Pending
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_announce_due() {
        let f = fixture();
        let post = scheduled(&f, "Novidades", jan21(9)).await;
        scheduled(&f, "Later", jan21(9) + Duration::days(5)).await;
        assert_eq!(f.registry.announce_due().await.unwrap(), 0);

        f.clock.advance(Duration::days(1));
        assert_eq!(f.registry.announce_due().await.unwrap(), 1);
        let last = f.events.0.lock().unwrap().last().cloned();
        assert_eq!(
            last,
            Some(PostEvent::Due {
                id: post.id(),
                scheduled_for: jan21(9)
            })
        );
    }

    #[tokio::test]
    async fn test_status_counts_and_calendar() {
        let f = fixture();
        scheduled(&f, "a", jan21(9)).await;
        f.registry.create(new_post("b")).await.unwrap();

        let counts = f.registry.status_counts().await.unwrap();
        assert_eq!(counts.all, 2);
        assert_eq!(counts.scheduled, 1);
        assert_eq!(counts.draft, 1);

        let grid = f
            .registry
            .calendar(YearMonth::new(2024, 1).unwrap())
            .await
            .unwrap();
        let day = grid
            .cell(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap())
            .unwrap();
        assert_eq!(day.posts.len(), 1);
    }
}
