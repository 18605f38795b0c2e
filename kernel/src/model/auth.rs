use crate::model::id::{GroupId, UserId};

/// 外部の認証レイヤーが発行する、検証済みのリクエスト主体。
/// コア側ではトークンやパスワードを一切解釈しない。
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct AccessToken(pub String);
