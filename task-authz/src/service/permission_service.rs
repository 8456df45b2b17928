// src/service/permission_service.rs

use crate::domain::actor::Actor;
use crate::domain::permission::{AccessDecision, DenialReason, Permission};
use crate::domain::role_model::{AccessTier, Role, RoleProfile};
use crate::error::AppResult;
use crate::service::organization_hierarchy_service::{HierarchyCycleError, OrganizationHierarchy};
use crate::utils::error_helper::forbidden_error;
use std::collections::HashSet;
use uuid::Uuid;

/// アクセス判定エンジン
///
/// 状態を持たない純粋な判定のみを行い、I/O もエラー送出もしない。
pub struct PermissionService;

impl PermissionService {
    /// 単一操作の可否を判定
    ///
    /// 判定順序:
    /// 1. ロールが権限を持たなければ拒否（Viewer の読み取り以外は「閲覧のみ」として拒否）
    /// 2. Owner/Admin は同一組織なら無条件で許可
    /// 3. Viewer は同一組織のタスク閲覧のみ許可
    /// 4. 組織をまたぐ更新・削除は所有者のみ（組織全体の権限を持つロールを除く）
    /// 5. それ以外は許可
    pub fn decide<R: RoleProfile + ?Sized>(
        role: &R,
        actor_organization_id: Uuid,
        resource_organization_id: Uuid,
        required_permission: Permission,
        is_resource_owner: bool,
    ) -> AccessDecision {
        if !role.grants(required_permission) {
            return Self::deny_missing_permission(role, required_permission);
        }

        let same_organization = actor_organization_id == resource_organization_id;
        let tier = role.access_tier();

        if tier == AccessTier::OrganizationWide && same_organization {
            return AccessDecision::allow();
        }

        if tier == AccessTier::ReadOnly {
            if required_permission != Permission::ReadTask {
                return AccessDecision::deny(DenialReason::ViewerReadOnly);
            }
            if !same_organization {
                return AccessDecision::deny(DenialReason::CrossOrganization);
            }
            return AccessDecision::allow();
        }

        if required_permission.is_mutation()
            && !is_resource_owner
            && tier != AccessTier::OrganizationWide
        {
            return AccessDecision::deny(DenialReason::OwnershipRequired);
        }

        AccessDecision::allow()
    }

    /// 権限不足の拒否判定
    ///
    /// 閲覧のみのロールが読み取り以外を求めた場合は理由を `ViewerReadOnly` にする。
    pub fn deny_missing_permission<R: RoleProfile + ?Sized>(
        role: &R,
        required_permission: Permission,
    ) -> AccessDecision {
        if role.access_tier() == AccessTier::ReadOnly && required_permission != Permission::ReadTask
        {
            AccessDecision::deny(DenialReason::ViewerReadOnly)
        } else {
            AccessDecision::deny(DenialReason::RoleLacksPermission)
        }
    }

    /// ロールが権限を持つか（組織に依存しない）
    pub fn has_permission(role: Role, permission: Permission) -> bool {
        role.grants(permission)
    }

    /// 操作主体が参照できる組織ID
    ///
    /// Owner は自組織とその子孫、Admin/Viewer は自組織のみ。
    pub fn accessible_organization_ids(
        actor: &Actor,
        hierarchy: &OrganizationHierarchy,
    ) -> Result<HashSet<Uuid>, HierarchyCycleError> {
        let mut organization_ids = HashSet::from([actor.organization_id]);
        if actor.role.is_owner() {
            organization_ids.extend(hierarchy.descendants_of(actor.organization_id)?);
        }
        Ok(organization_ids)
    }

    /// リソースの組織が操作主体のスコープ内か
    pub fn check_organization_scope(
        actor: &Actor,
        resource_organization_id: Uuid,
        hierarchy: &OrganizationHierarchy,
    ) -> Result<AccessDecision, HierarchyCycleError> {
        let in_scope = if actor.role.is_owner() {
            hierarchy.is_descendant_or_self(resource_organization_id, actor.organization_id)?
        } else {
            resource_organization_id == actor.organization_id
        };

        Ok(if in_scope {
            AccessDecision::allow()
        } else {
            AccessDecision::deny(DenialReason::CrossOrganization)
        })
    }

    /// 個別リソースへの操作判定（スコープ確認の後に `decide` を適用）
    pub fn authorize(
        actor: &Actor,
        resource_organization_id: Uuid,
        resource_user_id: Option<Uuid>,
        required_permission: Permission,
        hierarchy: &OrganizationHierarchy,
    ) -> Result<AccessDecision, HierarchyCycleError> {
        // 権限不足は組織に関係なく先に判定する
        if !actor.role.grants(required_permission) {
            return Ok(Self::deny_missing_permission(&actor.role, required_permission));
        }

        let scope = Self::check_organization_scope(actor, resource_organization_id, hierarchy)?;
        if scope.is_denied() {
            return Ok(scope);
        }

        let is_owner = resource_user_id.is_some_and(|owner| actor.owns(owner));
        Ok(Self::decide(
            &actor.role,
            actor.organization_id,
            resource_organization_id,
            required_permission,
            is_owner,
        ))
    }

    /// 拒否判定を Forbidden エラーに変換
    pub fn ensure_allowed(decision: AccessDecision, actor: &Actor, context: &str) -> AppResult<()> {
        if decision.is_allowed() {
            return Ok(());
        }

        let reason = decision
            .reason
            .unwrap_or(DenialReason::RoleLacksPermission);
        Err(forbidden_error(reason, context, actor.user_id))
    }
}
