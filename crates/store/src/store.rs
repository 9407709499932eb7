//! The in-memory store and lifecycle & activity engine.
//!
//! `PlanStore` holds the authoritative working set for the current
//! session: plans plus the side collections keyed by plan id (comments,
//! attachments, activity log, approval workflows) and the notification
//! inbox. It is an explicit handle, constructed once at application start
//! and passed by reference; there is no global instance.
//!
//! Every mutation runs synchronously to completion and appends the
//! matching activity entry; nothing here suspends. The async persistence
//! boundary is crossed only in [`PlanStore::hydrate`] and the `persist_*`
//! methods.
//!
//! Lookup misses follow the store's permissive contract: plan mutations on
//! an unknown id are silent no-ops (`None`/`false`), never errors. Only
//! the approval workflow returns errors, because its compare-and-set must
//! distinguish "absent" from "already resolved".

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;

use threew_core::activity::{ActivityEntry, ActivityKind};
use threew_core::approval::{ApprovalStatus, ApprovalWorkflow};
use threew_core::attachment::Attachment;
use threew_core::comment::{Comment, Reaction};
use threew_core::error::CoreError;
use threew_core::filter::{sort_plans, PlanFilter, SortKey};
use threew_core::notification::{Notification, NotificationKind};
use threew_core::plan::{ActionPlan, CreatePlan, Status, UpdatePlan, COPY_SUFFIX};
use threew_core::project::Project;
use threew_core::team::TeamMember;
use threew_core::types::{new_id, RecordId, Timestamp};

use crate::notify::NotificationChannel;
use crate::persistence::{DocumentStore, PersistenceError};

/// The session's working set of action plans and side collections.
pub struct PlanStore {
    plans: IndexMap<RecordId, ActionPlan>,
    comments: HashMap<RecordId, Vec<Comment>>,
    attachments: HashMap<RecordId, Vec<Attachment>>,
    activity: HashMap<RecordId, Vec<ActivityEntry>>,
    approvals: HashMap<RecordId, ApprovalWorkflow>,
    inbox: Vec<Notification>,
    projects: IndexMap<RecordId, Project>,
    channel: Arc<dyn NotificationChannel>,
}

impl PlanStore {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self {
            plans: IndexMap::new(),
            comments: HashMap::new(),
            attachments: HashMap::new(),
            activity: HashMap::new(),
            approvals: HashMap::new(),
            inbox: Vec::new(),
            projects: IndexMap::new(),
            channel,
        }
    }

    // -----------------------------------------------------------------------
    // Plan CRUD
    // -----------------------------------------------------------------------

    /// Create a plan from a draft.
    ///
    /// Assigns a fresh id, stamps created/updated, seeds the status
    /// history, and appends a `created` activity entry. Drafts are taken
    /// as-is; validation is the caller's opt-in concern.
    pub fn add(&mut self, draft: CreatePlan, actor: &str) -> &ActionPlan {
        let now = Utc::now();
        let id = new_id();
        let plan = ActionPlan::new(id.clone(), draft, now, actor);
        tracing::info!(plan_id = %id, actor = %actor, title = %plan.title, "Action plan created");
        self.log_activity(
            &id,
            ActivityKind::Created,
            actor,
            format!("created \"{}\"", plan.title),
            now,
        );
        self.plans.entry(id).or_insert(plan)
    }

    /// Merge a partial update into a plan.
    ///
    /// A present, differing `status` appends a history entry and a
    /// `status_changed` activity entry; any other change logs `updated`.
    /// Silent no-op (`None`) when the id is unknown.
    pub fn update(&mut self, id: &str, patch: UpdatePlan, actor: &str) -> Option<&ActionPlan> {
        let now = Utc::now();
        let (status_changed, from, to) = {
            let plan = self.plans.get_mut(id)?;
            let from = plan.status;
            let changed = plan.apply(patch, now, actor);
            (changed, from, plan.status)
        };
        if status_changed {
            tracing::info!(plan_id = %id, actor = %actor, from = from.as_str(), to = to.as_str(), "Status changed");
            self.log_activity(
                id,
                ActivityKind::StatusChanged,
                actor,
                format!("status {} -> {}", from.as_str(), to.as_str()),
                now,
            );
        } else {
            self.log_activity(id, ActivityKind::Updated, actor, "updated fields".to_string(), now);
        }
        self.plans.get(id)
    }

    /// Delete a plan, cascading its comments, attachments, activity log,
    /// and approval workflow. Returns `false` (no error) when absent.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.plans.shift_remove(id).is_none() {
            return false;
        }
        self.comments.remove(id);
        self.attachments.remove(id);
        self.activity.remove(id);
        self.approvals.remove(id);
        tracing::info!(plan_id = %id, "Action plan deleted");
        true
    }

    /// Clone a plan into a fresh record: new id, title suffixed
    /// `" (Copy)"`, status reset to `pending`. Comments and the other side
    /// collections are not copied. Silent no-op when the id is unknown.
    pub fn duplicate(&mut self, id: &str, actor: &str) -> Option<&ActionPlan> {
        let source = self.plans.get(id)?.clone();
        let draft = CreatePlan {
            title: format!("{}{}", source.title, COPY_SUFFIX),
            what: source.what,
            who: source.who,
            when: source.when,
            priority: source.priority,
            status: Status::Pending,
            tags: source.tags,
            dependencies: source.dependencies,
            checklist: source.checklist,
        };
        let now = Utc::now();
        let copy_id = new_id();
        let plan = ActionPlan::new(copy_id.clone(), draft, now, actor);
        tracing::info!(plan_id = %copy_id, source_id = %id, actor = %actor, "Action plan duplicated");
        self.log_activity(
            &copy_id,
            ActivityKind::Duplicated,
            actor,
            format!("duplicated from {id}"),
            now,
        );
        Some(self.plans.entry(copy_id).or_insert(plan))
    }

    pub fn get(&self, id: &str) -> Option<&ActionPlan> {
        self.plans.get(id)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans passing the filter, in working-set (insertion) order.
    pub fn filtered(&self, filter: &PlanFilter) -> Vec<&ActionPlan> {
        self.plans.values().filter(|p| filter.matches(p)).collect()
    }

    /// Filtered and sorted view.
    pub fn query(&self, filter: &PlanFilter, key: SortKey, descending: bool) -> Vec<&ActionPlan> {
        let mut plans = self.filtered(filter);
        sort_plans(&mut plans, key, descending);
        plans
    }

    /// Owned snapshot of the working set, for the metrics engine.
    pub fn snapshot(&self) -> Vec<ActionPlan> {
        self.plans.values().cloned().collect()
    }

    // -----------------------------------------------------------------------
    // Comments, attachments, checklist
    // -----------------------------------------------------------------------

    /// Add a comment; mentioned members each get a `mention` notification.
    /// Silent no-op when the plan is unknown.
    pub fn add_comment(
        &mut self,
        plan_id: &str,
        author: TeamMember,
        content: impl Into<String>,
        mentions: Vec<RecordId>,
    ) -> Option<Comment> {
        if !self.plans.contains_key(plan_id) {
            return None;
        }
        let now = Utc::now();
        let comment = Comment {
            id: new_id(),
            action_plan_id: plan_id.to_string(),
            author,
            content: content.into(),
            created_at: now,
            mentions,
            reactions: Vec::new(),
        };
        let author_id = comment.author.id.clone();
        for mentioned in comment.mentions.clone() {
            self.notify(
                &mentioned,
                plan_id,
                NotificationKind::Mention {
                    comment_id: comment.id.clone(),
                    mentioned_by: author_id.clone(),
                },
                now,
            );
        }
        self.log_activity(
            plan_id,
            ActivityKind::Commented,
            &author_id,
            "added a comment".to_string(),
            now,
        );
        self.comments
            .entry(plan_id.to_string())
            .or_default()
            .push(comment.clone());
        Some(comment)
    }

    /// Append a reaction to a comment. Duplicates from the same user are
    /// kept; reactions are counted, not deduplicated.
    pub fn add_reaction(&mut self, plan_id: &str, comment_id: &str, emoji: &str, user_id: &str) -> bool {
        let Some(comments) = self.comments.get_mut(plan_id) else {
            return false;
        };
        let Some(comment) = comments.iter_mut().find(|c| c.id == comment_id) else {
            return false;
        };
        comment.reactions.push(Reaction {
            emoji: emoji.to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
        });
        true
    }

    pub fn comments(&self, plan_id: &str) -> &[Comment] {
        self.comments.get(plan_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attach a file to a plan. Silent no-op when the plan is unknown.
    pub fn add_attachment(
        &mut self,
        plan_id: &str,
        file_name: impl Into<String>,
        url: impl Into<String>,
        size_bytes: u64,
        uploaded_by: &str,
    ) -> Option<Attachment> {
        if !self.plans.contains_key(plan_id) {
            return None;
        }
        let now = Utc::now();
        let attachment = Attachment {
            id: new_id(),
            action_plan_id: plan_id.to_string(),
            file_name: file_name.into(),
            url: url.into(),
            size_bytes,
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: now,
        };
        self.log_activity(
            plan_id,
            ActivityKind::AttachmentAdded,
            uploaded_by,
            format!("attached {}", attachment.file_name),
            now,
        );
        self.attachments
            .entry(plan_id.to_string())
            .or_default()
            .push(attachment.clone());
        Some(attachment)
    }

    pub fn attachments(&self, plan_id: &str) -> &[Attachment] {
        self.attachments.get(plan_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flip a checklist item, returning its new `done` state.
    pub fn toggle_checklist_item(&mut self, plan_id: &str, item_id: &str, actor: &str) -> Option<bool> {
        let now = Utc::now();
        let (done, text) = {
            let plan = self.plans.get_mut(plan_id)?;
            let item = plan.checklist.iter_mut().find(|i| i.id == item_id)?;
            item.done = !item.done;
            plan.updated_at = now;
            (item.done, item.text.clone())
        };
        let state = if done { "done" } else { "reopened" };
        self.log_activity(
            plan_id,
            ActivityKind::ChecklistToggled,
            actor,
            format!("{state}: {text}"),
            now,
        );
        Some(done)
    }

    /// Activity log for a plan, newest first.
    pub fn activity(&self, plan_id: &str) -> Vec<&ActivityEntry> {
        self.activity
            .get(plan_id)
            .map(|entries| entries.iter().rev().collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Approval workflow
    // -----------------------------------------------------------------------

    /// Open a pending approval workflow for a plan and notify every
    /// approver. A still-pending existing workflow is a conflict; a
    /// resolved one is replaced by the new request.
    pub fn request_approval(
        &mut self,
        plan_id: &str,
        requested_by: &str,
        approvers: Vec<RecordId>,
        comments: Option<String>,
    ) -> Result<(), CoreError> {
        if !self.plans.contains_key(plan_id) {
            return Err(CoreError::NotFound {
                entity: "ActionPlan",
                id: plan_id.to_string(),
            });
        }
        if let Some(existing) = self.approvals.get(plan_id) {
            if existing.status == ApprovalStatus::Pending {
                return Err(CoreError::Conflict(format!(
                    "plan {plan_id} already has a pending approval"
                )));
            }
        }
        let now = Utc::now();
        let workflow = ApprovalWorkflow::new(
            plan_id.to_string(),
            requested_by.to_string(),
            approvers,
            comments,
            now,
        );
        for approver in workflow.approvers.clone() {
            self.notify(
                &approver,
                plan_id,
                NotificationKind::ApprovalRequested {
                    requested_by: requested_by.to_string(),
                },
                now,
            );
        }
        tracing::info!(plan_id = %plan_id, requested_by = %requested_by, "Approval requested");
        self.log_activity(
            plan_id,
            ActivityKind::ApprovalRequested,
            requested_by,
            "requested approval".to_string(),
            now,
        );
        self.approvals.insert(plan_id.to_string(), workflow);
        Ok(())
    }

    /// Resolve a pending approval. Only the first response counts; a
    /// second one is a conflict and changes nothing. The original
    /// requester is notified of the outcome.
    pub fn respond_approval(
        &mut self,
        plan_id: &str,
        resolution: ApprovalStatus,
        resolved_by: &str,
        comments: Option<String>,
    ) -> Result<(), CoreError> {
        let now = Utc::now();
        let requester = {
            let workflow = self.approvals.get_mut(plan_id).ok_or(CoreError::NotFound {
                entity: "ApprovalWorkflow",
                id: plan_id.to_string(),
            })?;
            workflow.respond(resolution, resolved_by, comments, now)?;
            workflow.requested_by.clone()
        };
        self.notify(
            &requester,
            plan_id,
            NotificationKind::ApprovalResolved {
                resolution,
                resolved_by: resolved_by.to_string(),
            },
            now,
        );
        tracing::info!(plan_id = %plan_id, resolved_by = %resolved_by, "Approval resolved");
        self.log_activity(
            plan_id,
            ActivityKind::ApprovalResolved,
            resolved_by,
            "resolved approval".to_string(),
            now,
        );
        Ok(())
    }

    pub fn approval(&self, plan_id: &str) -> Option<&ApprovalWorkflow> {
        self.approvals.get(plan_id)
    }

    // -----------------------------------------------------------------------
    // Notification inbox
    // -----------------------------------------------------------------------

    /// Notifications addressed to a member, newest first.
    pub fn notifications_for(&self, recipient: &str) -> Vec<&Notification> {
        self.inbox
            .iter()
            .rev()
            .filter(|n| n.recipient == recipient)
            .collect()
    }

    /// Mark one notification read. Returns `true` only when it was found
    /// and previously unread.
    pub fn mark_read(&mut self, notification_id: &str) -> bool {
        match self.inbox.iter_mut().find(|n| n.id == notification_id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every unread notification for a member read, returning how
    /// many changed.
    pub fn mark_all_read(&mut self, recipient: &str) -> usize {
        let mut changed = 0;
        for n in self.inbox.iter_mut() {
            if n.recipient == recipient && !n.read {
                n.read = true;
                changed += 1;
            }
        }
        changed
    }

    pub fn unread_count(&self, recipient: &str) -> usize {
        self.inbox
            .iter()
            .filter(|n| n.recipient == recipient && !n.read)
            .count()
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub fn add_project(&mut self, project: Project) -> &Project {
        self.projects.entry(project.id.clone()).or_insert(project)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Reference a plan from a project (non-owning; deleting the plan
    /// later does not edit this list). Deduplicates.
    pub fn assign_plan(&mut self, project_id: &str, plan_id: &str) -> bool {
        let Some(project) = self.projects.get_mut(project_id) else {
            return false;
        };
        if !project.plan_ids.iter().any(|p| p == plan_id) {
            project.plan_ids.push(plan_id.to_string());
        }
        true
    }

    // -----------------------------------------------------------------------
    // Persistence sync
    // -----------------------------------------------------------------------

    /// Replace the working set from the persistence collaborator.
    ///
    /// Fail-closed: any load error leaves the prior in-memory state
    /// untouched. Individual documents that cannot be decoded are skipped
    /// with a warning rather than failing the whole load; timestamps are
    /// coerced, defaulting to now.
    ///
    /// Side collections keyed by plan id (comments, attachments, activity,
    /// approvals) are pruned to the loaded ids in the same step, so no
    /// record can dangle behind a plan the load dropped.
    pub async fn hydrate(&mut self, docs: &dyn DocumentStore) -> Result<usize, PersistenceError> {
        let raw = docs.load_all().await?;
        let now = Utc::now();
        let mut loaded = IndexMap::new();
        for doc in &raw {
            match ActionPlan::from_document(doc, now) {
                Ok(plan) => {
                    loaded.insert(plan.id.clone(), plan);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping undecodable plan document");
                }
            }
        }
        let count = loaded.len();
        self.plans = loaded;
        let kept = &self.plans;
        self.comments.retain(|id, _| kept.contains_key(id));
        self.attachments.retain(|id, _| kept.contains_key(id));
        self.activity.retain(|id, _| kept.contains_key(id));
        self.approvals.retain(|id, _| kept.contains_key(id));
        tracing::info!(count, "Hydrated working set");
        Ok(count)
    }

    /// Write one plan back to the collaborator (update, falling back to
    /// create for documents the backend has never seen). Best effort: no
    /// retry, no rollback of local state on failure.
    pub async fn persist(&self, docs: &dyn DocumentStore, plan_id: &str) -> Result<(), PersistenceError> {
        let Some(plan) = self.plans.get(plan_id) else {
            return Ok(());
        };
        let doc = serde_json::to_value(plan)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        match docs.update(plan_id, doc.clone()).await {
            Ok(()) => Ok(()),
            Err(PersistenceError::Rejected(_)) => docs.create(plan_id, doc).await,
            Err(other) => {
                tracing::warn!(plan_id = %plan_id, error = %other, "Write-back failed");
                Err(other)
            }
        }
    }

    /// Write every plan back, stopping at the first failure.
    pub async fn persist_all(&self, docs: &dyn DocumentStore) -> Result<usize, PersistenceError> {
        let mut written = 0;
        for id in self.plans.keys() {
            self.persist(docs, id).await?;
            written += 1;
        }
        Ok(written)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn log_activity(&mut self, plan_id: &str, kind: ActivityKind, actor: &str, detail: String, now: Timestamp) {
        self.activity
            .entry(plan_id.to_string())
            .or_default()
            .push(ActivityEntry {
                id: new_id(),
                action_plan_id: plan_id.to_string(),
                kind,
                actor: actor.to_string(),
                detail,
                at: now,
            });
    }

    fn notify(&mut self, recipient: &str, plan_id: &str, kind: NotificationKind, now: Timestamp) {
        let notification = Notification {
            id: new_id(),
            recipient: recipient.to_string(),
            action_plan_id: plan_id.to_string(),
            kind,
            read: false,
            created_at: now,
        };
        self.channel.send(&notification);
        self.inbox.push(notification);
    }
}
