// crates/archive-desc/src/libs.rs

/// A top-level library: where its descriptor lives and what it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSpec {
    /// Directory relative to the build root.
    pub dir: &'static str,
    pub name: &'static str,
}

/// Top-level libraries, built in this order.
pub const LIBS: &[ArchiveSpec] = &[
    ArchiveSpec { dir: "layout/media/", name: "libgkmedias.a" },
    ArchiveSpec { dir: "media/mtransport/standalone/", name: "libmtransport_s.a" },
    ArchiveSpec { dir: "media/webrtc/signalingtest/signaling_ecc/", name: "libecc.a" },
    ArchiveSpec { dir: "media/webrtc/signaling/signaling_sipcc/", name: "libsipcc.a" },
    ArchiveSpec { dir: "netwerk/sctp/src/", name: "libnksctp_s.a" },
    ArchiveSpec { dir: "netwerk/srtp/src/", name: "libnksrtp_s.a" },
    ArchiveSpec { dir: "modules/zlib/src/", name: "libmozz.a" },
];
