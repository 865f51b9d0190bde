pub mod bits;
pub mod decoder;
pub mod scanner;

pub use bits::{crc16_ccitt, decode_12, reverse_bits, reverse_packet_bits};
pub use decoder::{decode_packet, PacketDecoder};
pub use scanner::{scan_line, ScannedFrame};
