use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::{
    config::{ManagerPreferences, Subscription},
    feat::{EventSink, NoopSink, RemoteRefresh, Severity, Signal},
    logging,
    process::AsyncHandler,
    state::pager::Pager,
    utils::{help::claim_id, logging::Type},
};

/// 单次刷新的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Unknown id or a url the remote cannot resolve.
    Skipped,
    Updated,
    Failed,
    /// Finished after the subscription was deleted or a newer refresh started.
    Discarded,
}

/// 批量刷新汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchRefreshSummary {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Whether the batch call failed and items were refreshed one by one.
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionStats {
    pub total: usize,
    pub enabled: usize,
    pub remote: usize,
    pub local: usize,
    pub updating: usize,
    pub node_total: u64,
}

/// A mutation that may have started background refresh work.
#[must_use]
#[derive(Debug)]
pub struct Mutation<T> {
    pub signal: Signal,
    pub task: Option<JoinHandle<T>>,
}

#[derive(Debug)]
struct SubscriptionState {
    items: Vec<Subscription>,
    pager: Pager,
    last_source: Option<Vec<Subscription>>,
    /// Latest refresh ticket per id. Only the holder may write results.
    tickets: HashMap<String, u64>,
    next_ticket: u64,
}

impl SubscriptionState {
    fn find_mut(&mut self, id: &str) -> Option<&mut Subscription> {
        self.items.iter_mut().find(|s| s.id == id)
    }

    fn taken_ids(&self) -> HashSet<String> {
        self.items.iter().map(|s| s.id.clone()).collect()
    }

    fn begin_attempt(&mut self, id: &str) -> u64 {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.tickets.insert(id.to_string(), self.next_ticket);
        self.next_ticket
    }

    fn is_current(&self, id: &str, ticket: u64) -> bool {
        self.tickets.get(id) == Some(&ticket)
    }

    fn finish_attempt(&mut self, id: &str, ticket: u64) {
        if !self.is_current(id, ticket) {
            return;
        }
        self.tickets.remove(id);
        if let Some(sub) = self.find_mut(id) {
            sub.is_updating = false;
        }
    }
}

struct Inner {
    state: RwLock<SubscriptionState>,
    remote: Arc<dyn RemoteRefresh>,
    sink: Arc<dyn EventSink>,
}

/// 订阅列表。克隆得到的是同一份状态的句柄，后台刷新任务持有其中一份。
#[derive(Clone)]
pub struct SubscriptionCollection {
    inner: Arc<Inner>,
}

impl SubscriptionCollection {
    pub fn new(
        prefs: &ManagerPreferences,
        remote: Arc<dyn RemoteRefresh>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let state = SubscriptionState {
            items: Vec::new(),
            pager: Pager::new(prefs.subscription_page_size),
            last_source: None,
            tickets: HashMap::new(),
            next_ticket: 0,
        };
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                remote,
                sink,
            }),
        }
    }

    pub fn with_remote(remote: Arc<dyn RemoteRefresh>) -> Self {
        Self::new(&ManagerPreferences::default(), remote, Arc::new(NoopSink))
    }

    /// 整体替换列表。所有条目回到空闲状态，进行中的刷新结果将被丢弃。
    pub fn initialize(&self, items: Vec<Subscription>) {
        let mut state = self.inner.state.write();
        let mut taken = HashSet::with_capacity(items.len());
        state.items = items
            .into_iter()
            .map(|mut sub| {
                claim_id(&mut sub.id, &mut taken);
                sub.is_updating = false;
                sub
            })
            .collect();
        state.tickets.clear();
        let len = state.items.len();
        state.pager.clamp(len);
        logging!(debug, Type::Subscription, "订阅列表已初始化，共 {} 个", len);
    }

    /// Re-initialize only when the source snapshot differs from the last one.
    pub fn sync_from_source(&self, snapshot: &[Subscription]) -> bool {
        {
            let mut state = self.inner.state.write();
            if state.last_source.as_deref() == Some(snapshot) {
                return false;
            }
            state.last_source = Some(snapshot.to_vec());
        }
        self.initialize(snapshot.to_vec());
        true
    }

    // ── views ──

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.inner.state.read().items.clone()
    }

    pub fn get(&self, id: &str) -> Option<Subscription> {
        self.inner
            .state
            .read()
            .items
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn current_page(&self) -> usize {
        self.inner.state.read().pager.current()
    }

    pub fn total_pages(&self) -> usize {
        let state = self.inner.state.read();
        state.pager.total_pages(state.items.len())
    }

    pub fn paginated(&self) -> Vec<Subscription> {
        let state = self.inner.state.read();
        state.items[state.pager.range(state.items.len())].to_vec()
    }

    pub fn change_page(&self, page: usize) -> bool {
        let mut state = self.inner.state.write();
        let len = state.items.len();
        state.pager.change_page(page, len)
    }

    pub fn total_count(&self) -> usize {
        self.inner.state.read().items.len()
    }

    pub fn enabled_count(&self) -> usize {
        self.inner
            .state
            .read()
            .items
            .iter()
            .filter(|s| s.enabled)
            .count()
    }

    pub fn enabled_items(&self) -> Vec<Subscription> {
        self.inner
            .state
            .read()
            .items
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> SubscriptionStats {
        let state = self.inner.state.read();
        state
            .items
            .iter()
            .fold(SubscriptionStats::default(), |mut stats, sub| {
                stats.total += 1;
                if sub.enabled {
                    stats.enabled += 1;
                }
                if sub.is_remote() {
                    stats.remote += 1;
                } else {
                    stats.local += 1;
                }
                if sub.is_updating {
                    stats.updating += 1;
                }
                stats.node_total = stats.node_total.saturating_add(sub.node_count);
                stats
            })
    }

    // ── mutations ──

    pub fn add(&self, mut sub: Subscription) -> Mutation<RefreshOutcome> {
        let id = {
            let mut state = self.inner.state.write();
            claim_id(&mut sub.id, &mut state.taken_ids());
            logging!(debug, Type::Subscription, "添加订阅: {} ({})", sub.name, sub.id);
            let id = sub.id.clone();
            state.items.insert(0, sub);
            let len = state.items.len();
            state.pager.rewind_if_full(len);
            id
        };
        let signal = self.request_persist();
        let task = self.spawn_refresh(id);
        Mutation { signal, task }
    }

    /// Replace by id. A changed url zeroes the node count, invalidates any
    /// refresh in flight and triggers a new one.
    pub fn update(&self, mut sub: Subscription) -> Mutation<RefreshOutcome> {
        let url_changed = {
            let mut state = self.inner.state.write();
            let Some(slot) = state.find_mut(&sub.id) else {
                logging!(debug, Type::Subscription, "更新订阅时未找到 id: {}", sub.id);
                return Mutation {
                    signal: Signal::Unchanged,
                    task: None,
                };
            };
            let url_changed = slot.url != sub.url;
            if url_changed {
                sub.node_count = 0;
                sub.is_updating = false;
            } else {
                sub.is_updating = slot.is_updating;
            }
            *slot = sub.clone();
            if url_changed {
                state.tickets.remove(&sub.id);
            }
            url_changed
        };

        self.inner.sink.mark_changed();
        let task = if url_changed {
            logging!(debug, Type::Subscription, "订阅地址已变更，重新获取节点数: {}", sub.id);
            self.spawn_refresh(sub.id)
        } else {
            None
        };
        Mutation {
            signal: Signal::ChangeMarked,
            task,
        }
    }

    pub fn delete(&self, id: &str) -> Signal {
        {
            let mut state = self.inner.state.write();
            let Some(index) = state.items.iter().position(|s| s.id == id) else {
                return Signal::Unchanged;
            };
            state.items.remove(index);
            state.tickets.remove(id);
            let len = state.items.len();
            state.pager.step_back_if_empty(len);
        }
        logging!(debug, Type::Subscription, "删除订阅: {}", id);
        self.request_persist()
    }

    pub fn delete_all(&self) -> Signal {
        {
            let mut state = self.inner.state.write();
            state.items.clear();
            state.tickets.clear();
            state.pager.reset();
        }
        logging!(debug, Type::Subscription, "已清空所有订阅");
        self.request_persist()
    }

    /// Prepend `subs`, then refresh the http(s) ones through one batch call.
    pub fn add_bulk(&self, subs: Vec<Subscription>) -> Mutation<BatchRefreshSummary> {
        let remote_ids: Vec<String> = {
            let mut state = self.inner.state.write();
            let mut taken = state.taken_ids();
            let mut incoming = subs;
            for sub in &mut incoming {
                claim_id(&mut sub.id, &mut taken);
            }
            let remote_ids = incoming
                .iter()
                .filter(|s| s.is_remote())
                .map(|s| s.id.clone())
                .collect();
            logging!(debug, Type::Subscription, "批量添加 {} 个订阅", incoming.len());
            state.items.splice(0..0, incoming);
            state.pager.reset();
            remote_ids
        };

        let signal = self.request_persist();
        if remote_ids.is_empty() {
            self.notify("批量导入完成！", Severity::Success);
            return Mutation { signal, task: None };
        }

        let this = self.clone();
        let task = AsyncHandler::spawn(move || async move { this.refresh_batch(remote_ids).await });
        Mutation { signal, task }
    }

    // ── refresh ──

    /// 刷新单个订阅的节点数与用量信息
    ///
    /// `initial_load` runs silently: no updating flag, no user messages and no
    /// change mark. Only the most recently started attempt for an id may write
    /// its result or clear the updating flag.
    pub async fn refresh_one(&self, id: &str, initial_load: bool) -> RefreshOutcome {
        let (url, name, ticket) = {
            let mut state = self.inner.state.write();
            let Some(sub) = state.find_mut(id) else {
                return RefreshOutcome::Skipped;
            };
            if !sub.is_remote() {
                return RefreshOutcome::Skipped;
            }
            if !initial_load {
                sub.is_updating = true;
            }
            let url = sub.url.clone();
            let name = sub.display_name().to_string();
            (url, name, state.begin_attempt(id))
        };
        let _finish = scopeguard::guard(ticket, |ticket| {
            self.inner.state.write().finish_attempt(id, ticket);
        });

        logging!(debug, Type::Refresh, "获取订阅节点数: {} (#{})", name, ticket);
        let outcome = match self.inner.remote.fetch_node_count(&url).await {
            Ok(info) => {
                let mut state = self.inner.state.write();
                if state.is_current(id, ticket) {
                    match state.find_mut(id) {
                        Some(sub) => {
                            sub.node_count = info.count.unwrap_or(0);
                            sub.user_info = info.user_info;
                            RefreshOutcome::Updated
                        }
                        None => RefreshOutcome::Discarded,
                    }
                } else {
                    RefreshOutcome::Discarded
                }
            }
            Err(err) => {
                logging!(warn, Type::Refresh, "获取订阅 {} 节点数失败: {:#}", name, err);
                if self.inner.state.read().is_current(id, ticket) {
                    RefreshOutcome::Failed
                } else {
                    RefreshOutcome::Discarded
                }
            }
        };

        if outcome == RefreshOutcome::Discarded {
            logging!(debug, Type::Refresh, "丢弃过期的刷新结果: {} (#{})", name, ticket);
        }
        if !initial_load {
            match outcome {
                RefreshOutcome::Updated => {
                    self.notify(&format!("{name} 已更新"), Severity::Success);
                    self.inner.sink.mark_changed();
                }
                RefreshOutcome::Failed => {
                    self.notify(&format!("{name} 更新失败"), Severity::Error);
                }
                RefreshOutcome::Skipped | RefreshOutcome::Discarded => {}
            }
        }
        outcome
    }

    /// Refresh every http(s) subscription concurrently.
    pub async fn refresh_all(&self, initial_load: bool) -> Vec<RefreshOutcome> {
        let ids: Vec<String> = self
            .inner
            .state
            .read()
            .items
            .iter()
            .filter(|s| s.is_remote())
            .map(|s| s.id.clone())
            .collect();
        logging!(info, Type::Refresh, "刷新 {} 个订阅", ids.len());
        join_all(ids.iter().map(|id| self.refresh_one(id, initial_load))).await
    }

    /// 批量刷新，失败时降级为逐个刷新
    pub async fn refresh_batch(&self, ids: Vec<String>) -> BatchRefreshSummary {
        let requested = ids.len();
        if requested == 0 {
            return BatchRefreshSummary::default();
        }
        self.notify(&format!("正在批量更新 {requested} 个订阅..."), Severity::Info);

        let tickets: HashMap<String, u64> = {
            let mut state = self.inner.state.write();
            ids.iter()
                .map(|id| (id.clone(), state.begin_attempt(id)))
                .collect()
        };
        let tickets = scopeguard::guard(tickets, |tickets| {
            let mut state = self.inner.state.write();
            for (id, ticket) in tickets {
                state.finish_attempt(&id, ticket);
            }
        });

        match self.inner.remote.batch_update_nodes(&ids).await {
            Ok(response) if response.success => {
                let succeeded = {
                    let mut state = self.inner.state.write();
                    let mut succeeded = 0;
                    for result in response.results.into_iter().filter(|r| r.success) {
                        let Some(&ticket) = tickets.get(&result.id) else {
                            continue;
                        };
                        succeeded += 1;
                        if !state.is_current(&result.id, ticket) {
                            continue;
                        }
                        if let Some(sub) = state.find_mut(&result.id) {
                            if let Some(count) = result.node_count {
                                sub.node_count = count;
                            }
                            if result.user_info.is_some() {
                                sub.user_info = result.user_info;
                            }
                        }
                    }
                    succeeded
                };
                logging!(info, Type::Refresh, "批量更新完成: {}/{}", succeeded, requested);
                self.notify(
                    &format!("批量更新完成！成功更新 {succeeded}/{requested} 个订阅"),
                    Severity::Success,
                );
                self.inner.sink.mark_changed();
                BatchRefreshSummary {
                    requested,
                    succeeded,
                    failed: requested.saturating_sub(succeeded),
                    fallback: false,
                }
            }
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| "未知错误".to_string());
                logging!(warn, Type::Refresh, "批量更新被拒绝: {}，降级为逐个更新", message);
                self.notify(&format!("批量更新失败: {message}"), Severity::Error);
                self.notify("正在降级到逐个更新模式...", Severity::Info);
                drop(tickets);
                self.refresh_sequentially(&ids).await
            }
            Err(err) => {
                logging!(warn, Type::Refresh, "批量更新出错: {:#}，降级为逐个更新", err);
                self.notify("批量更新失败，正在降级到逐个更新...", Severity::Error);
                drop(tickets);
                self.refresh_sequentially(&ids).await
            }
        }
    }

    async fn refresh_sequentially(&self, ids: &[String]) -> BatchRefreshSummary {
        let mut succeeded = 0;
        for id in ids {
            if self.refresh_one(id, false).await == RefreshOutcome::Updated {
                succeeded += 1;
            }
        }
        BatchRefreshSummary {
            requested: ids.len(),
            succeeded,
            failed: ids.len() - succeeded,
            fallback: true,
        }
    }

    // ── helpers ──

    fn spawn_refresh(&self, id: String) -> Option<JoinHandle<RefreshOutcome>> {
        let this = self.clone();
        AsyncHandler::spawn(move || async move { this.refresh_one(&id, false).await })
    }

    fn request_persist(&self) -> Signal {
        self.inner.sink.notify_persist();
        Signal::PersistRequested
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.inner.sink.notify_user(message, severity);
    }
}
