use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::{
    config::{ManagerPreferences, Node},
    feat::{EventSink, NoopSink, Severity, Signal},
    logging,
    state::pager::Pager,
    utils::{
        canonical::canonicalize,
        collate::CollationKey,
        country::aliases_for,
        help::claim_id,
        logging::Type,
        region::{RegionClassifier, UNCLASSIFIED},
    },
};

/// 去重结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    pub removed: usize,
    pub signal: Signal,
}

/// 手动节点列表：搜索、分页、去重与按地区排序
pub struct NodeCollection {
    nodes: Vec<Node>,
    pager: Pager,
    search_term: String,
    classifier: RegionClassifier,
    sink: Arc<dyn EventSink>,
    last_source: Option<Vec<Node>>,
}

impl Default for NodeCollection {
    fn default() -> Self {
        Self::new(&ManagerPreferences::default(), Arc::new(NoopSink))
    }
}

impl NodeCollection {
    pub fn new(prefs: &ManagerPreferences, sink: Arc<dyn EventSink>) -> Self {
        Self {
            nodes: Vec::new(),
            pager: Pager::new(prefs.node_page_size),
            search_term: String::new(),
            classifier: prefs.region_classifier(),
            sink,
            last_source: None,
        }
    }

    /// 整体替换列表，补齐缺失的 id
    pub fn initialize(&mut self, items: Vec<Node>) {
        let mut taken = HashSet::with_capacity(items.len());
        self.nodes = items
            .into_iter()
            .map(|mut node| {
                claim_id(&mut node.id, &mut taken);
                node
            })
            .collect();
        let len = self.filtered_len();
        self.pager.clamp(len);
        logging!(debug, Type::Node, "节点列表已初始化，共 {} 个", self.nodes.len());
    }

    /// Re-initialize only when the source snapshot differs from the last one.
    pub fn sync_from_source(&mut self, snapshot: &[Node]) -> bool {
        if self.last_source.as_deref() == Some(snapshot) {
            return false;
        }
        self.last_source = Some(snapshot.to_vec());
        self.initialize(snapshot.to_vec());
        true
    }

    // ── views ──

    pub fn items(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Set the free-text filter; always returns to page 1.
    pub fn search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.pager.reset();
    }

    pub fn filtered(&self) -> Vec<&Node> {
        if self.search_term.is_empty() {
            return self.nodes.iter().collect();
        }
        let needle = self.search_term.to_lowercase();
        let aliases = aliases_for(&needle);
        self.nodes
            .iter()
            .filter(|node| {
                let name = node.name.to_lowercase();
                name.contains(&needle) || aliases.iter().any(|alias| name.contains(alias.as_str()))
            })
            .collect()
    }

    fn filtered_len(&self) -> usize {
        if self.search_term.is_empty() {
            self.nodes.len()
        } else {
            self.filtered().len()
        }
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered_len())
    }

    pub fn paginated(&self) -> Vec<&Node> {
        let filtered = self.filtered();
        let range = self.pager.range(filtered.len());
        filtered[range].to_vec()
    }

    pub fn change_page(&mut self, page: usize) -> bool {
        let len = self.filtered_len();
        self.pager.change_page(page, len)
    }

    pub fn total_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn enabled_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.enabled).count()
    }

    pub fn enabled_items(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.enabled).collect()
    }

    // ── mutations ──

    pub fn add(&mut self, mut node: Node) -> Signal {
        claim_id(&mut node.id, &mut self.taken_ids());
        logging!(debug, Type::Node, "添加节点: {} ({})", node.name, node.id);
        self.nodes.insert(0, node);
        let len = self.filtered_len();
        self.pager.rewind_if_full(len);
        self.request_persist("节点已添加，正在保存...")
    }

    pub fn update(&mut self, node: Node) -> Signal {
        let Some(slot) = self.nodes.iter_mut().find(|n| n.id == node.id) else {
            logging!(debug, Type::Node, "更新节点时未找到 id: {}", node.id);
            return Signal::Unchanged;
        };
        logging!(debug, Type::Node, "更新节点: {} ({})", node.name, node.id);
        *slot = node;
        self.sink.mark_changed();
        Signal::ChangeMarked
    }

    pub fn delete(&mut self, id: &str) -> Signal {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return Signal::Unchanged;
        };
        self.nodes.remove(index);
        let len = self.filtered_len();
        self.pager.step_back_if_empty(len);
        logging!(debug, Type::Node, "删除节点: {}", id);
        self.request_persist("节点已删除，正在保存并刷新...")
    }

    pub fn delete_all(&mut self) -> Signal {
        logging!(debug, Type::Node, "清空 {} 个手动节点", self.nodes.len());
        self.nodes.clear();
        self.pager.reset();
        self.search_term.clear();
        self.request_persist("所有手动节点已清空，正在刷新...")
    }

    pub fn add_bulk(&mut self, nodes: Vec<Node>) -> Signal {
        let mut incoming = nodes;
        let mut taken = self.taken_ids();
        for node in &mut incoming {
            claim_id(&mut node.id, &mut taken);
        }
        logging!(debug, Type::Node, "批量添加 {} 个节点", incoming.len());
        self.nodes.splice(0..0, incoming);
        self.pager.reset();
        self.request_persist("批量导入成功，正在保存...")
    }

    /// Drop later nodes whose canonical url key was already seen.
    pub fn deduplicate(&mut self) -> DedupReport {
        let before = self.nodes.len();
        let mut seen = HashSet::with_capacity(before);
        self.nodes.retain(|node| seen.insert(canonicalize(&node.url)));
        let removed = before - self.nodes.len();

        if removed == 0 {
            logging!(info, Type::Dedup, "没有发现重复的节点");
            self.sink.notify_user("没有发现重复的节点。", Severity::Info);
            return DedupReport {
                removed,
                signal: Signal::Unchanged,
            };
        }

        let len = self.filtered_len();
        self.pager.clamp(len);
        logging!(info, Type::Dedup, "移除了 {} 个重复节点", removed);
        let signal = self.request_persist(&format!("成功移除 {removed} 个重复节点，正在保存..."));
        DedupReport { removed, signal }
    }

    /// 按地区优先级排序，同地区按名称排序
    pub fn auto_sort(&mut self) -> Signal {
        let classifier = &mut self.classifier;
        self.nodes
            .sort_by_cached_key(|node| (classifier.rank(&node.name), CollationKey(node.name.clone())));
        logging!(
            info,
            Type::Sort,
            "节点排序完成，共 {} 个，缓存名称 {} 个",
            self.nodes.len(),
            self.classifier.cached_names()
        );
        self.request_persist("节点排序完成，正在保存...")
    }

    /// Node counts per region: priority order first, then any other codes,
    /// unclassified last. Empty regions are omitted.
    pub fn region_breakdown(&mut self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(self.classifier.classify(&node.name)).or_default() += 1;
        }

        let mut breakdown = Vec::with_capacity(counts.len());
        for code in self.classifier.priority() {
            if let Some(count) = counts.remove(code.as_str()) {
                breakdown.push((code.clone(), count));
            }
        }
        let unclassified = counts.remove(UNCLASSIFIED);
        breakdown.extend(counts.into_iter().map(|(code, n)| (code.to_string(), n)));
        if let Some(count) = unclassified {
            breakdown.push((UNCLASSIFIED.to_string(), count));
        }
        breakdown
    }

    // ── helpers ──

    fn taken_ids(&self) -> HashSet<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn request_persist(&self, message: &str) -> Signal {
        self.sink.notify_user(message, Severity::Success);
        self.sink.notify_persist();
        Signal::PersistRequested
    }
}
