#![cfg_attr(docsrs, feature(doc_cfg))]

//! LRU caches for the read path
//! 读取路径的 LRU 缓存
//!
//! Two concrete shapes instead of one generic abstraction: `Lru` bounds by
//! entry count (open table handles keyed by filename), `SizeLru` bounds by
//! total byte size (decoded blocks keyed by table id and offset). Both
//! evict strictly by recency on top of hashlink::LruCache's linked-list
//! order tracking.
//! 两种具体形态而非一个泛型抽象：`Lru` 按条目数量限制（按文件名索引的
//! 打开表句柄），`SizeLru` 按总字节大小限制（按表 id 和偏移索引的解码块）。
//! 两者都基于 hashlink::LruCache 的链表顺序跟踪，严格按访问时间淘汰。
//!
//! # Complexity
//! 复杂度
//!
//! | Cache   | get  | set            | rm   | Space |
//! |---------|------|----------------|------|-------|
//! | Lru     | O(1) | O(1)           | O(1) | O(n)  |
//! | SizeLru | O(1) | O(1) amortized | O(1) | O(n)  |

mod lru;
mod size;

pub use lru::Lru;
pub use size::SizeLru;
