//! TCP listener whose connections are closed after a period without I/O

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::serve::Listener;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Instant, Sleep};

pub struct IdleTimeoutListener {
  inner: TcpListener,
  idle: Duration,
}

impl IdleTimeoutListener {
  pub fn new(inner: TcpListener, idle: Duration) -> Self {
    Self { inner, idle }
  }
}

impl Listener for IdleTimeoutListener {
  type Io = IdleTimeoutStream;
  type Addr = SocketAddr;

  async fn accept(&mut self) -> (Self::Io, Self::Addr) {
    let (stream, addr) = Listener::accept(&mut self.inner).await;
    (IdleTimeoutStream::new(stream, self.idle), addr)
  }

  fn local_addr(&self) -> io::Result<Self::Addr> {
    self.inner.local_addr()
  }
}

/// Connection that fails with `TimedOut` once no read or write has made
/// progress for `idle`
pub struct IdleTimeoutStream {
  inner: TcpStream,
  idle: Duration,
  deadline: Pin<Box<Sleep>>,
}

impl IdleTimeoutStream {
  fn new(inner: TcpStream, idle: Duration) -> Self {
    Self { inner, idle, deadline: Box::pin(tokio::time::sleep(idle)) }
  }

  fn touch(&mut self) {
    let next = Instant::now() + self.idle;
    self.deadline.as_mut().reset(next);
  }

  fn poll_progress<T>(&mut self, cx: &mut Context<'_>, poll: Poll<io::Result<T>>) -> Poll<io::Result<T>> {
    match poll {
      Poll::Ready(result) => {
        self.touch();
        Poll::Ready(result)
      }
      Poll::Pending => match self.deadline.as_mut().poll(cx) {
        Poll::Ready(()) => {
          Poll::Ready(Err(io::Error::new(io::ErrorKind::TimedOut, "connection idle timeout")))
        }
        Poll::Pending => Poll::Pending,
      },
    }
  }
}

impl AsyncRead for IdleTimeoutStream {
  fn poll_read(
    self: Pin<&mut Self>,
    cx: &mut Context<'_>,
    buf: &mut ReadBuf<'_>,
  ) -> Poll<io::Result<()>> {
    let this = self.get_mut();
    let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
    this.poll_progress(cx, poll)
  }
}

impl AsyncWrite for IdleTimeoutStream {
  fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
    let this = self.get_mut();
    let poll = Pin::new(&mut this.inner).poll_write(cx, buf);
    this.poll_progress(cx, poll)
  }

  fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
    let this = self.get_mut();
    let poll = Pin::new(&mut this.inner).poll_flush(cx);
    this.poll_progress(cx, poll)
  }

  fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
    Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};

  async fn connected_pair(idle: Duration) -> (IdleTimeoutStream, TcpStream) {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let mut listener = IdleTimeoutListener::new(tcp, idle);

    let client = TcpStream::connect(addr).await.unwrap();
    let (server_side, _) = listener.accept().await;
    (server_side, client)
  }

  #[tokio::test]
  async fn test_idle_connection_times_out() {
    let (mut server_side, _client) = connected_pair(Duration::from_millis(50)).await;

    let mut buf = [0u8; 8];
    let err = server_side.read(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
  }

  #[tokio::test]
  async fn test_traffic_keeps_connection_alive() {
    let (mut server_side, mut client) = connected_pair(Duration::from_secs(5)).await;

    client.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    server_side.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");
  }
}
