//! In-flight load registry: at most one loader per cache key
//! 进行中加载注册表：每个缓存键最多一个加载者
//!
//! The first requester of a missing key becomes the leader and performs the
//! load; concurrent requesters park a waker on the pending slot and receive
//! the broadcast result. On failure nothing is inserted and every waiter
//! sees the error wrapped as CacheLoad.
//! 缺失键的第一个请求者成为加载者执行加载；并发请求者在挂起槽位上登记
//! waker 并接收广播结果。失败时不插入任何条目，所有等待者收到包装为
//! CacheLoad 的错误。

use std::{
  cell::RefCell,
  collections::HashMap,
  future::Future,
  hash::Hash,
  io,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll, Waker},
};

use crate::{Error, Result};

struct Pending<V> {
  done: Option<Result<V>>,
  wakers: Vec<Waker>,
}

/// Pending loads keyed by cache key
/// 按缓存键索引的挂起加载
pub(crate) struct Flight<K, V> {
  pending: HashMap<K, Rc<RefCell<Pending<V>>>>,
}

/// Role handed to a requester
/// 分配给请求者的角色
pub(crate) enum Begin<K: Hash + Eq + Clone, V: Clone> {
  /// Perform the load, then finish the guard
  /// 执行加载，然后用 guard 结束
  Lead(LeadGuard<K, V>),
  /// Await the leader's broadcast
  /// 等待加载者的广播
  Wait(Wait<V>),
}

impl<K: Hash + Eq + Clone, V: Clone> Flight<K, V> {
  pub fn new() -> Self {
    Self {
      pending: HashMap::new(),
    }
  }

  /// Join the pending load for key, or become its leader
  /// 加入该键的挂起加载，或成为其加载者
  pub fn begin(flight: &Rc<RefCell<Self>>, key: K) -> Begin<K, V> {
    let mut this = flight.borrow_mut();
    if let Some(slot) = this.pending.get(&key) {
      return Begin::Wait(Wait {
        slot: Rc::clone(slot),
      });
    }
    let slot = Rc::new(RefCell::new(Pending {
      done: None,
      wakers: Vec::new(),
    }));
    this.pending.insert(key.clone(), slot);
    Begin::Lead(LeadGuard {
      flight: Rc::clone(flight),
      key: Some(key),
    })
  }

  fn finish(&mut self, key: &K, result: Result<V>) {
    if let Some(slot) = self.pending.remove(key) {
      let mut p = slot.borrow_mut();
      p.done = Some(result);
      for w in p.wakers.drain(..) {
        w.wake();
      }
    }
  }
}

/// Obligation to complete the load; dropping unfinished aborts it
/// 完成加载的义务；未完成即被丢弃则中止加载
pub(crate) struct LeadGuard<K: Hash + Eq + Clone, V: Clone> {
  flight: Rc<RefCell<Flight<K, V>>>,
  key: Option<K>,
}

impl<K: Hash + Eq + Clone, V: Clone> LeadGuard<K, V> {
  /// Broadcast the load result and clear the pending slot
  /// 广播加载结果并清除挂起槽位
  pub fn finish(mut self, result: Result<V>) {
    if let Some(key) = self.key.take() {
      self.flight.borrow_mut().finish(&key, result);
    }
  }
}

impl<K: Hash + Eq + Clone, V: Clone> Drop for LeadGuard<K, V> {
  fn drop(&mut self) {
    if let Some(key) = self.key.take() {
      // Leader future dropped mid-load, fail the waiters instead of
      // wedging them
      // 加载者 future 中途被丢弃，使等待者失败而非永久卡住
      let aborted = Error::Io {
        kind: io::ErrorKind::Interrupted,
        msg: "load aborted".into(),
      };
      self.flight.borrow_mut().finish(&key, Err(aborted));
    }
  }
}

/// Future resolving with the leader's broadcast result
/// 以加载者广播结果完成的 future
pub(crate) struct Wait<V> {
  slot: Rc<RefCell<Pending<V>>>,
}

impl<V: Clone> Future for Wait<V> {
  type Output = Result<V>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut p = self.slot.borrow_mut();
    match &p.done {
      Some(Ok(v)) => Poll::Ready(Ok(v.clone())),
      Some(Err(e)) => Poll::Ready(Err(Error::CacheLoad(Box::new(e.clone())))),
      None => {
        p.wakers.push(cx.waker().clone());
        Poll::Pending
      }
    }
  }
}
