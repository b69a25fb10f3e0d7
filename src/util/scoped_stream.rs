use std::{
  pin::Pin,
  task::{Context, Poll},
};

use futures::Stream;

/// A stream that keeps `guard` alive until the inner stream is exhausted
/// or the stream itself is dropped, whichever comes first.
///
/// Used to tie the lifetime of a temporary download directory to the
/// response body that reads from it.
pub struct ScopedStream<T, G> {
  stream: T,
  guard: Option<G>,
}

impl<T, G> ScopedStream<T, G> {
  pub fn new(stream: T, guard: G) -> Self {
    ScopedStream {
      stream,
      guard: Some(guard),
    }
  }

  #[cfg(test)]
  fn is_holding(&self) -> bool {
    self.guard.is_some()
  }
}

impl<T, G> Stream for ScopedStream<T, G>
where
  T: Stream + Unpin,
  G: Unpin,
{
  type Item = T::Item;

  fn poll_next(
    mut self: Pin<&mut Self>,
    cx: &mut Context<'_>,
  ) -> Poll<Option<Self::Item>> {
    let this = &mut *self;
    let poll = Pin::new(&mut this.stream).poll_next(cx);
    if let Poll::Ready(None) = poll {
      // fully drained, release right away
      this.guard.take();
    }
    poll
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.stream.size_hint()
  }
}
