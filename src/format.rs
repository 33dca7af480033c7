//! PKZIP binary record encoders.
//!
//! Every function here is pure: given a populated record it returns the
//! exact bytes the APPNOTE layout requires, little-endian throughout
//! except for the signatures, which are the documented PKZIP constants.
//! This is the only module where wire-format constants appear.

/// Local file header signature `PK\x03\x04`
pub const LOCAL_FILE_HEADER_SIG: u32 = 0x0403_4b50;
/// Data descriptor signature `PK\x07\x08`
pub const DATA_DESCRIPTOR_SIG: u32 = 0x0807_4b50;
/// Central directory file header signature `PK\x01\x02`
pub const CENTRAL_DIR_SIG: u32 = 0x0201_4b50;
/// End of central directory signature `PK\x05\x06`
pub const EOCD_SIG: u32 = 0x0605_4b50;
/// ZIP64 end of central directory record signature `PK\x06\x06`
pub const ZIP64_EOCD_SIG: u32 = 0x0606_4b50;
/// ZIP64 end of central directory locator signature `PK\x06\x07`
pub const ZIP64_EOCD_LOC_SIG: u32 = 0x0706_4b50;

/// "Version made by" written into central directory headers
pub const VERSION_MADE_BY: u16 = 45;
/// "Version needed to extract" for entries that don't require ZIP64
pub const VERSION_NEEDED_STD: u16 = 20;
/// "Version needed to extract" for entries that require ZIP64
pub const VERSION_NEEDED_ZIP64: u16 = 45;

/// General purpose bit flags: bit 3 (data descriptor follows), bit 11 (UTF-8 names)
pub const GEN_PURPOSE_FLAGS: u16 = 0x0808;

/// Compression method: stored (no compression)
pub const METHOD_STORE: u16 = 0;
/// Compression method: DEFLATE
pub const METHOD_DEFLATE: u16 = 8;

/// Sizes/offsets at or above this value require ZIP64 fields
pub const ZIP64_THRESHOLD: u64 = u32::MAX as u64;
/// Entry counts at or above this value require the ZIP64 EOCD record
pub const MAX_U16: u64 = u16::MAX as u64;

const ZIP64_EXTRA_TAG: u16 = 0x0001;

/// Encode an MS-DOS time word: `(hour<<11) | (minute<<5) | (second>>1)`.
pub fn dos_time(hour: u8, minute: u8, second: u8) -> u16 {
    ((hour as u16) << 11) | ((minute as u16) << 5) | ((second as u16) >> 1)
}

/// Encode an MS-DOS date word: `((year-1980)<<9) | (month<<5) | day`.
pub fn dos_date(year: u16, month: u8, day: u8) -> u16 {
    (((year - 1980) as u16) << 9) | ((month as u16) << 5) | (day as u16)
}

/// Fields needed to encode a local file header. Sizes and CRC are always
/// zero here; the data descriptor carries the real values.
pub struct LocalFileHeaderFields<'a> {
    pub compression_method: u16,
    pub dos_time: u16,
    pub dos_date: u16,
    pub name: &'a [u8],
}

/// Encode a local file header (30 bytes + name length). No ZIP64 extra
/// field is ever placed here; a ZIP64 data descriptor carries sizes when
/// needed (see [`encode_data_descriptor`]).
pub fn encode_local_file_header(fields: &LocalFileHeaderFields<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(30 + fields.name.len());
    buf.extend_from_slice(&LOCAL_FILE_HEADER_SIG.to_le_bytes());
    buf.extend_from_slice(&VERSION_NEEDED_STD.to_le_bytes());
    buf.extend_from_slice(&GEN_PURPOSE_FLAGS.to_le_bytes());
    buf.extend_from_slice(&fields.compression_method.to_le_bytes());
    buf.extend_from_slice(&fields.dos_time.to_le_bytes());
    buf.extend_from_slice(&fields.dos_date.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // crc32 placeholder
    buf.extend_from_slice(&0u32.to_le_bytes()); // compressed size placeholder
    buf.extend_from_slice(&0u32.to_le_bytes()); // uncompressed size placeholder
    buf.extend_from_slice(&(fields.name.len() as u16).to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // extra field length
    buf.extend_from_slice(fields.name);
    buf
}

/// Encode a data descriptor. Standard form is 16 bytes (4+4 byte sizes);
/// ZIP64 form is 24 bytes (8+8 byte sizes).
pub fn encode_data_descriptor(crc32: u32, compressed_size: u64, uncompressed_size: u64, zip64: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(if zip64 { 24 } else { 16 });
    buf.extend_from_slice(&DATA_DESCRIPTOR_SIG.to_le_bytes());
    buf.extend_from_slice(&crc32.to_le_bytes());
    if zip64 {
        buf.extend_from_slice(&compressed_size.to_le_bytes());
        buf.extend_from_slice(&uncompressed_size.to_le_bytes());
    } else {
        buf.extend_from_slice(&(compressed_size as u32).to_le_bytes());
        buf.extend_from_slice(&(uncompressed_size as u32).to_le_bytes());
    }
    buf
}

/// Fields needed to encode one central directory file header.
pub struct CentralDirectoryFields<'a> {
    pub compression_method: u16,
    pub dos_time: u16,
    pub dos_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub local_header_offset: u64,
    pub external_attrs: u32,
    pub name: &'a [u8],
    pub comment: &'a [u8],
    pub zip64: bool,
}

/// Encode a central directory file header (46 bytes + name + extra + comment).
pub fn encode_central_directory_header(fields: &CentralDirectoryFields<'_>) -> Vec<u8> {
    let version_needed = if fields.zip64 { VERSION_NEEDED_ZIP64 } else { VERSION_NEEDED_STD };

    let extra: Vec<u8> = if fields.zip64 {
        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&fields.uncompressed_size.to_le_bytes());
        data.extend_from_slice(&fields.compressed_size.to_le_bytes());
        data.extend_from_slice(&fields.local_header_offset.to_le_bytes());

        let mut extra = Vec::with_capacity(4 + data.len());
        extra.extend_from_slice(&ZIP64_EXTRA_TAG.to_le_bytes());
        extra.extend_from_slice(&(data.len() as u16).to_le_bytes());
        extra.extend_from_slice(&data);
        extra
    } else {
        Vec::new()
    };

    let mut buf = Vec::with_capacity(46 + fields.name.len() + extra.len() + fields.comment.len());
    buf.extend_from_slice(&CENTRAL_DIR_SIG.to_le_bytes());
    buf.extend_from_slice(&VERSION_MADE_BY.to_le_bytes());
    buf.extend_from_slice(&version_needed.to_le_bytes());
    buf.extend_from_slice(&GEN_PURPOSE_FLAGS.to_le_bytes());
    buf.extend_from_slice(&fields.compression_method.to_le_bytes());
    buf.extend_from_slice(&fields.dos_time.to_le_bytes());
    buf.extend_from_slice(&fields.dos_date.to_le_bytes());
    buf.extend_from_slice(&fields.crc32.to_le_bytes());

    if fields.zip64 {
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    } else {
        buf.extend_from_slice(&(fields.compressed_size as u32).to_le_bytes());
        buf.extend_from_slice(&(fields.uncompressed_size as u32).to_le_bytes());
    }

    buf.extend_from_slice(&(fields.name.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(fields.comment.len() as u16).to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk number start
    buf.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    buf.extend_from_slice(&fields.external_attrs.to_le_bytes());

    if fields.zip64 {
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    } else {
        buf.extend_from_slice(&(fields.local_header_offset as u32).to_le_bytes());
    }

    buf.extend_from_slice(fields.name);
    buf.extend_from_slice(&extra);
    buf.extend_from_slice(fields.comment);
    buf
}

/// Encode the standard end-of-central-directory record (22 bytes, no
/// archive comment). `total_records`/`cd_size`/`cd_offset` are the real
/// (possibly ZIP64-sized) values; sentinel truncation happens inside.
pub fn encode_eocd(total_records: u64, cd_size: u64, cd_offset: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(22);
    buf.extend_from_slice(&EOCD_SIG.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk number
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk with central dir start

    if total_records >= MAX_U16 {
        buf.extend_from_slice(&0xFFFFu16.to_le_bytes());
        buf.extend_from_slice(&0xFFFFu16.to_le_bytes());
    } else {
        buf.extend_from_slice(&(total_records as u16).to_le_bytes());
        buf.extend_from_slice(&(total_records as u16).to_le_bytes());
    }

    if cd_size >= ZIP64_THRESHOLD {
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    } else {
        buf.extend_from_slice(&(cd_size as u32).to_le_bytes());
    }

    if cd_offset >= ZIP64_THRESHOLD {
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    } else {
        buf.extend_from_slice(&(cd_offset as u32).to_le_bytes());
    }

    buf.extend_from_slice(&0u16.to_le_bytes()); // comment length
    buf
}

/// Encode the ZIP64 end-of-central-directory record (56 bytes) followed
/// by its locator (20 bytes). `zip64_eocd_offset` is the byte offset at
/// which the ZIP64 EOCD record itself is written (immediately after the
/// central directory, immediately before the standard EOCD).
pub fn encode_zip64_eocd_and_locator(
    total_records: u64,
    cd_size: u64,
    cd_offset: u64,
    zip64_eocd_offset: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(56 + 20);

    buf.extend_from_slice(&ZIP64_EOCD_SIG.to_le_bytes());
    let record_size: u64 = 44; // bytes following this field within the record
    buf.extend_from_slice(&record_size.to_le_bytes());
    buf.extend_from_slice(&VERSION_MADE_BY.to_le_bytes());
    buf.extend_from_slice(&VERSION_NEEDED_ZIP64.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // disk number
    buf.extend_from_slice(&0u32.to_le_bytes()); // disk with central dir start
    buf.extend_from_slice(&total_records.to_le_bytes()); // entries on this disk
    buf.extend_from_slice(&total_records.to_le_bytes()); // total entries
    buf.extend_from_slice(&cd_size.to_le_bytes());
    buf.extend_from_slice(&cd_offset.to_le_bytes());

    buf.extend_from_slice(&ZIP64_EOCD_LOC_SIG.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // disk with the zip64 eocd record
    buf.extend_from_slice(&zip64_eocd_offset.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes()); // total number of disks

    buf
}
