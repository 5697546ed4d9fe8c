use std::io::{ErrorKind, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info};

use crate::frame::FrameError;
use crate::source::FrameSource;

/// Build a blocking TCP listener on the loopback address with
/// SO_REUSEADDR set, so repeated test runs can rebind the port without
/// waiting out TIME_WAIT. Backlog of 1: only a single client is served.
pub fn bind(port: u16) -> Result<TcpListener, FrameError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    socket.bind(&addr.into())?;
    socket.listen(1)?;
    Ok(socket.into())
}

/// Accept one inbound connection and stream frames to it at the target
/// rate. Frames are raw pixel bytes with no framing or handshake; each
/// iteration is paced by sleeping out the remainder of the frame
/// interval. Returns cleanly when the client disconnects.
pub fn serve(
    listener: &TcpListener,
    source: &mut dyn FrameSource,
    frame_rate: u32,
) -> Result<(), FrameError> {
    if frame_rate == 0 {
        return Err(FrameError::ZeroFrameRate);
    }
    let interval = Duration::from_secs(1) / frame_rate;

    let (mut conn, peer) = listener.accept()?;
    info!(%peer, "client connected");

    loop {
        let t_start = Instant::now();
        let frame = source.next_frame()?;
        match conn.write_all(frame.data()) {
            Ok(()) => {}
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::BrokenPipe
                        | ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                ) =>
            {
                info!(%peer, "client disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        debug!(bytes = frame.data().len(), "frame sent");

        if let Some(remaining) = interval.checked_sub(t_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameParameters, PixelFormat};
    use crate::gradient::gradient_frame;
    use crate::source::PatternSource;
    use std::io::Read;
    use std::net::TcpStream;
    use std::thread;

    #[test]
    fn streams_pattern_frames_and_stops_on_disconnect() {
        let params = FrameParameters::new(8, 4, PixelFormat::Rgb).unwrap();
        let frame_size = params.frame_size_bytes();

        let listener = bind(0).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let mut source = PatternSource::new(params);
            serve(&listener, &mut source, 1000)
        });

        let mut conn = TcpStream::connect(addr).unwrap();
        let mut buf = vec![0u8; frame_size * 2];
        conn.read_exact(&mut buf).unwrap();
        drop(conn);

        assert_eq!(&buf[..frame_size], gradient_frame(params, 0).data());
        assert_eq!(&buf[frame_size..], gradient_frame(params, 1).data());

        server.join().unwrap().unwrap();
    }

    #[test]
    fn replayed_file_loops_across_the_wire() {
        let params = FrameParameters::new(2, 2, PixelFormat::Gray8).unwrap();
        let frame = [10u8, 20, 30, 40];
        let path =
            std::env::temp_dir().join(format!("frameserve-test-{}.raw", uuid::Uuid::new_v4()));
        std::fs::write(&path, frame).unwrap();

        let listener = bind(0).unwrap();
        let addr = listener.local_addr().unwrap();
        let source_path = path.clone();
        let server = thread::spawn(move || {
            let mut source = crate::source::FileFrameSource::open(&source_path, params).unwrap();
            serve(&listener, &mut source, 1000)
        });

        let mut conn = TcpStream::connect(addr).unwrap();
        // Two frames from a one-frame file: the second only arrives if the
        // source looped back to offset zero.
        let mut buf = [0u8; 8];
        conn.read_exact(&mut buf).unwrap();
        drop(conn);

        assert_eq!(&buf[..4], &frame);
        assert_eq!(&buf[4..], &frame);

        server.join().unwrap().unwrap();
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn zero_frame_rate_rejected() {
        let params = FrameParameters::new(2, 2, PixelFormat::Rgb).unwrap();
        let listener = bind(0).unwrap();
        let mut source = PatternSource::new(params);
        let err = serve(&listener, &mut source, 0).unwrap_err();
        assert!(matches!(err, FrameError::ZeroFrameRate));
    }
}
