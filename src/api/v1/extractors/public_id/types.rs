/**
 * Responsibility
 *
 * 主な責務
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置くもの
 *  - ArtTag などのタグ型
 *  - type PublicArtId = PublicId<ArtTag> のような alias
 */
use super::core::PublicId;

// arts
pub enum ArtTag {}
pub type PublicArtId = PublicId<ArtTag>;
