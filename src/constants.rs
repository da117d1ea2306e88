/// BMP 文件的标准头部大小 (字节)。
/// 隐写操作将原样复制这个头部，从像素数据开始嵌入。
pub const BMP_HEADER_SIZE: usize = 54;

/// 文件头中像素数据起始偏移字段 (bfOffBits) 的偏移量。
pub const PIXEL_DATA_OFFSET_FIELD: usize = 10;

/// 信息头大小字段的偏移量。
pub const INFO_HEADER_SIZE_OFFSET: usize = 14;

/// BITMAPINFOHEADER 的大小。只有它能让像素数据紧跟在 54 字节头部之后。
pub const INFO_HEADER_SIZE: u32 = 40;

/// 头部中图像宽度字段的偏移量 (4 字节小端序)。
pub const WIDTH_OFFSET: usize = 18;

/// 头部中图像高度字段的偏移量 (4 字节小端序)。
pub const HEIGHT_OFFSET: usize = 22;

/// 头部中每像素位数字段的偏移量 (2 字节小端序)。
pub const BITS_PER_PIXEL_OFFSET: usize = 28;

/// 头部中压缩方式字段的偏移量 (4 字节小端序)。
pub const COMPRESSION_OFFSET: usize = 30;

/// 每个像素的颜色通道数 (B, G, R)，每个通道 1 字节。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 隐藏一个字节所需的载体字节数。
/// 每个载体字节的最低有效位存储 1 bit，因此 8 bits 需要 8 个载体字节。
pub const BYTE_WINDOW: usize = 8;

/// 隐藏一个 `u32` 长度字段所需的载体字节数 (32 bits → 32 个载体字节)。
pub const SIZE_WINDOW: usize = 32;

/// 长度字段本身占用的字节数。
pub const SIZE_FIELD_BYTES: u64 = 4;

/// 默认签名，用于识别图像中是否包含隐藏的容器。
pub const DEFAULT_SIGNATURE: &[u8] = b"#*";

/// 默认允许隐藏的秘密文件扩展名。
pub const DEFAULT_EXTENSIONS: &[&str] = &[".txt", ".c", ".sh"];

/// 未指定输出路径时，隐写图像的默认文件名。
pub const DEFAULT_STEGO_NAME: &str = "steged_img.bmp";

/// 未指定输出路径时，恢复文件的默认文件名主干 (后接恢复出的扩展名)。
pub const DEFAULT_DECODED_STEM: &str = "decoded";
