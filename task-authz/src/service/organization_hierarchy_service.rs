// src/service/organization_hierarchy_service.rs

use crate::domain::actor::Actor;
use crate::domain::organization_model::Organization;
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::organization_repository::OrganizationRepository;
use crate::service::permission_service::PermissionService;
use crate::utils::error_helper::hierarchy_cycle_error;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 組織階層が森になっていない（循環参照がある）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("organization hierarchy contains a cycle at {organization_id}")]
pub struct HierarchyCycleError {
    pub organization_id: Uuid,
}

/// 組織ID -> 親組織ID の読み取り専用スナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationHierarchy {
    parents: HashMap<Uuid, Option<Uuid>>,
}

impl OrganizationHierarchy {
    /// 全組織から階層を構築（O(n)）
    pub fn build(organizations: &[Organization]) -> Self {
        Self::from_parent_links(organizations.iter().map(|o| (o.id, o.parent_id)))
    }

    pub fn from_parent_links(links: impl IntoIterator<Item = (Uuid, Option<Uuid>)>) -> Self {
        Self {
            parents: links.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, organization_id: Uuid) -> bool {
        self.parents.contains_key(&organization_id)
    }

    /// 親組織（ルートまたは未登録なら None）
    pub fn parent_of(&self, organization_id: Uuid) -> Option<Uuid> {
        self.parents.get(&organization_id).copied().flatten()
    }

    /// 親を持たない組織
    pub fn roots(&self) -> Vec<Uuid> {
        self.parents
            .iter()
            .filter(|(_, parent)| parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    fn children_index(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (id, parent) in &self.parents {
            if let Some(parent) = parent {
                children.entry(*parent).or_default().push(*id);
            }
        }
        children
    }

    /// `root` の子孫をすべて取得（`root` 自身は含まない）
    ///
    /// 探索済み集合を持つ幅優先探索で、同じ組織に再訪した時点で循環とみなして中断する。
    pub fn descendants_of(&self, root: Uuid) -> Result<HashSet<Uuid>, HierarchyCycleError> {
        let children = self.children_index();
        let mut visited = HashSet::from([root]);
        let mut frontier: VecDeque<Uuid> = children.get(&root).into_iter().flatten().copied().collect();

        while let Some(current) = frontier.pop_front() {
            if !visited.insert(current) {
                return Err(HierarchyCycleError {
                    organization_id: current,
                });
            }
            if let Some(next) = children.get(&current) {
                frontier.extend(next.iter().copied());
            }
        }

        visited.remove(&root);
        Ok(visited)
    }

    /// `candidate` が `ancestor` 自身かその子孫かを判定
    ///
    /// 親をたどって上方向に歩く。親がない、または親が未登録の組織に達したら false。
    pub fn is_descendant_or_self(
        &self,
        candidate: Uuid,
        ancestor: Uuid,
    ) -> Result<bool, HierarchyCycleError> {
        if candidate == ancestor {
            return Ok(true);
        }

        let mut visited = HashSet::from([candidate]);
        let mut current = candidate;
        while let Some(parent) = self.parent_of(current) {
            if parent == ancestor {
                return Ok(true);
            }
            if !visited.insert(parent) {
                return Err(HierarchyCycleError {
                    organization_id: parent,
                });
            }
            current = parent;
        }

        Ok(false)
    }

    /// 祖先を近い順に取得
    pub fn ancestors_of(&self, organization_id: Uuid) -> Result<Vec<Uuid>, HierarchyCycleError> {
        let mut ancestors = Vec::new();
        let mut visited = HashSet::from([organization_id]);
        let mut current = organization_id;
        while let Some(parent) = self.parent_of(current) {
            if !visited.insert(parent) {
                return Err(HierarchyCycleError {
                    organization_id: parent,
                });
            }
            ancestors.push(parent);
            current = parent;
        }
        Ok(ancestors)
    }

    /// `child` の親を `new_parent` に付け替えると循環するか
    pub fn would_create_cycle(
        &self,
        child: Uuid,
        new_parent: Uuid,
    ) -> Result<bool, HierarchyCycleError> {
        self.is_descendant_or_self(new_parent, child)
    }
}

/// 全組織から階層を構築
pub fn build_hierarchy(organizations: &[Organization]) -> OrganizationHierarchy {
    OrganizationHierarchy::build(organizations)
}

/// 子孫組織の集合
pub fn descendants_of(
    hierarchy: &OrganizationHierarchy,
    root: Uuid,
) -> Result<HashSet<Uuid>, HierarchyCycleError> {
    hierarchy.descendants_of(root)
}

pub fn is_descendant_or_self(
    hierarchy: &OrganizationHierarchy,
    candidate: Uuid,
    ancestor: Uuid,
) -> Result<bool, HierarchyCycleError> {
    hierarchy.is_descendant_or_self(candidate, ancestor)
}

struct CacheState {
    generation: u64,
    snapshot: Option<Arc<OrganizationHierarchy>>,
}

/// リクエストをまたいで階層スナップショットを共有するキャッシュ
///
/// 読み手は `Arc` ごと受け取るので、更新前後どちらかの完全なスナップショットしか見えない。
pub struct HierarchyCache {
    state: RwLock<CacheState>,
}

impl Default for HierarchyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState {
                generation: 0,
                snapshot: None,
            }),
        }
    }

    /// 現在のスナップショットと世代番号
    pub async fn snapshot(&self) -> (Option<Arc<OrganizationHierarchy>>, u64) {
        let state = self.state.read().await;
        (state.snapshot.clone(), state.generation)
    }

    /// 読み込み開始時の世代が変わっていなければ保存する
    pub async fn store(&self, hierarchy: Arc<OrganizationHierarchy>, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.snapshot = Some(hierarchy);
        true
    }

    /// 親子関係が変わったときに呼ぶ
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.snapshot = None;
    }
}

pub struct OrganizationHierarchyService {
    organization_repo: Arc<dyn OrganizationRepository>,
    cache: Option<HierarchyCache>,
}

impl OrganizationHierarchyService {
    /// キャッシュなし（呼び出しごとに再構築）
    pub fn new(organization_repo: Arc<dyn OrganizationRepository>) -> Self {
        Self {
            organization_repo,
            cache: None,
        }
    }

    pub fn with_cache(organization_repo: Arc<dyn OrganizationRepository>) -> Self {
        Self {
            organization_repo,
            cache: Some(HierarchyCache::new()),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    // 組織階層のスナップショットを取得
    pub async fn hierarchy(&self) -> AppResult<Arc<OrganizationHierarchy>> {
        let generation = match &self.cache {
            Some(cache) => {
                let (snapshot, generation) = cache.snapshot().await;
                if let Some(snapshot) = snapshot {
                    return Ok(snapshot);
                }
                Some(generation)
            }
            None => None,
        };

        let organizations = self.organization_repo.find_all_organizations().await?;
        let hierarchy = Arc::new(OrganizationHierarchy::build(&organizations));

        log_with_context!(
            tracing::Level::DEBUG,
            "Organization hierarchy built",
            "organization_count" => hierarchy.len()
        );

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            cache.store(hierarchy.clone(), generation).await;
        }

        Ok(hierarchy)
    }

    pub async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate().await;
            log_with_context!(tracing::Level::DEBUG, "Organization hierarchy cache invalidated");
        }
    }

    // 子孫組織の取得
    pub async fn descendants_of(&self, organization_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let hierarchy = self.hierarchy().await?;
        hierarchy
            .descendants_of(organization_id)
            .map_err(|e| hierarchy_cycle_error(e, organization_id))
    }

    pub async fn is_descendant_or_self(&self, candidate: Uuid, ancestor: Uuid) -> AppResult<bool> {
        let hierarchy = self.hierarchy().await?;
        hierarchy
            .is_descendant_or_self(candidate, ancestor)
            .map_err(|e| hierarchy_cycle_error(e, candidate))
    }

    /// 操作主体が参照できる組織ID
    pub async fn accessible_organization_ids(&self, actor: &Actor) -> AppResult<HashSet<Uuid>> {
        let hierarchy = self.hierarchy().await?;
        PermissionService::accessible_organization_ids(actor, &hierarchy)
            .map_err(|e| hierarchy_cycle_error(e, actor.organization_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Uuid, Uuid, Uuid, OrganizationHierarchy) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let hierarchy =
            OrganizationHierarchy::from_parent_links([(a, None), (b, Some(a)), (c, Some(b))]);
        (a, b, c, hierarchy)
    }

    #[test]
    fn test_descendants_exclude_root() {
        let (a, b, c, hierarchy) = chain();

        assert_eq!(hierarchy.descendants_of(a).unwrap(), HashSet::from([b, c]));
        assert_eq!(hierarchy.descendants_of(b).unwrap(), HashSet::from([c]));
        assert!(hierarchy.descendants_of(c).unwrap().is_empty());
        assert!(hierarchy.descendants_of(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_is_descendant_or_self_walks_upward() {
        let (a, b, c, hierarchy) = chain();

        assert!(hierarchy.is_descendant_or_self(c, a).unwrap());
        assert!(hierarchy.is_descendant_or_self(b, b).unwrap());
        assert!(!hierarchy.is_descendant_or_self(a, c).unwrap());
        assert!(!hierarchy.is_descendant_or_self(a, Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_missing_parent_is_treated_as_root() {
        let orphan = Uuid::new_v4();
        let ghost_parent = Uuid::new_v4();
        let other = Uuid::new_v4();
        let hierarchy =
            OrganizationHierarchy::from_parent_links([(orphan, Some(ghost_parent)), (other, None)]);

        assert!(hierarchy.is_descendant_or_self(orphan, ghost_parent).unwrap());
        assert!(!hierarchy.is_descendant_or_self(orphan, other).unwrap());
        assert_eq!(hierarchy.ancestors_of(orphan).unwrap(), vec![ghost_parent]);
    }

    #[test]
    fn test_cycle_is_reported_instead_of_looping() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let hierarchy = OrganizationHierarchy::from_parent_links([
            (a, Some(b)),
            (b, Some(a)),
            (outsider, None),
        ]);

        assert!(hierarchy.descendants_of(a).is_err());
        assert!(hierarchy.is_descendant_or_self(a, outsider).is_err());
        assert!(hierarchy.ancestors_of(b).is_err());
        // 循環に触れないクエリは通常どおり答える
        assert!(hierarchy.descendants_of(outsider).unwrap().is_empty());
    }

    #[test]
    fn test_would_create_cycle() {
        let (a, b, c, hierarchy) = chain();

        assert!(hierarchy.would_create_cycle(a, c).unwrap());
        assert!(hierarchy.would_create_cycle(b, b).unwrap());
        assert!(!hierarchy.would_create_cycle(c, a).unwrap());
    }

    #[test]
    fn test_build_is_idempotent() {
        let root = Organization::new("Root");
        let child = Organization::with_parent("Child", root.id);
        let organizations = vec![root.clone(), child.clone()];

        let first = build_hierarchy(&organizations);
        let second = build_hierarchy(&organizations);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.parent_of(child.id), Some(root.id));
        assert_eq!(first.roots(), vec![root.id]);
    }

    #[tokio::test]
    async fn test_cache_rejects_stale_store_after_invalidation() {
        let cache = HierarchyCache::new();
        let (_, generation) = cache.snapshot().await;

        cache.invalidate().await;
        let stored = cache
            .store(Arc::new(OrganizationHierarchy::default()), generation)
            .await;

        assert!(!stored);
        assert!(cache.snapshot().await.0.is_none());
    }
}
