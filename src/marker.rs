#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SOFType {
    /// SOF0
    BaselineDCT,

    /// SOF1
    ExtendedSequentialDCT,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Marker {
    /// Start Of Frame markers
    SOF(SOFType),
    /// Define Huffman table(s)
    DHT,
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of scan
    SOS,
    /// Define quantization table(s)
    DQT,
    /// Reserved for application segments
    APP(u8),
    /// Comment
    COM,
}

impl From<Marker> for u8 {
    fn from(marker: Marker) -> Self {
        use self::Marker::*;
        match marker {
            SOF(SOFType::BaselineDCT) => 0xC0,
            SOF(SOFType::ExtendedSequentialDCT) => 0xC1,
            DHT => 0xC4,
            SOI => 0xD8,
            EOI => 0xD9,
            SOS => 0xDA,
            DQT => 0xDB,
            APP(v) => 0xE0 + v,
            COM => 0xFE,
        }
    }
}
