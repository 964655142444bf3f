use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::{UnsynchronizationScheme, encode_syncsafe, unsynchronize};
use crate::id3::v2::{Frame, FrameFlags, Id3v2Version};
use crate::macros::{err, unsupported};

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

// The largest size a 3 byte ID3v2.2 frame size can hold
const MAX_V2_FRAME_SIZE: usize = (1 << 24) - 1;

pub(in crate::id3::v2) fn create_items<W>(
	writer: &mut W,
	frames: &[Frame],
	version: Id3v2Version,
	unsynchronise_frames: bool,
	write_options: WriteOptions,
) -> Result<()>
where
	W: Write,
{
	for frame in frames {
		let Some(id) = frame.resolve_id(version) else {
			log::warn!(
				"Discarding frame: {}, not representable in {}",
				frame.id_str(),
				version
			);
			continue;
		};

		let value = frame.as_bytes(version, write_options)?;
		if value.is_empty() {
			log::trace!("Omitting frame {} with no content", id);
			continue;
		}

		let flags = frame.flags().for_write();
		if version == Id3v2Version::V2 && flags.encryption.is_some() {
			log::warn!(
				"Discarding encrypted frame: {}, not representable in {}",
				frame.id_str(),
				version
			);
			continue;
		}

		// An encrypted body can't be decompressed to recover its length, and ID3v2.4 requires it
		if version == Id3v2Version::V4
			&& flags.encryption.is_some()
			&& flags.data_length_indicator.is_none()
		{
			unsupported!(@BAIL id, "Encrypted frame has no data length indicator for ID3v2.4");
		}

		log::trace!("Writing {} frame as {}", frame.name(), id);
		write_frame(writer, &id, flags, &value, version, unsynchronise_frames)?;
	}

	Ok(())
}

fn write_frame<W>(
	writer: &mut W,
	id: &str,
	mut flags: FrameFlags,
	value: &[u8],
	version: Id3v2Version,
	unsynchronise: bool,
) -> Result<()>
where
	W: Write,
{
	if version == Id3v2Version::V2 {
		if value.len() > MAX_V2_FRAME_SIZE {
			err!(TooMuchData);
		}

		writer.write_all(id.as_bytes())?;
		writer.write_u24::<BigEndian>(value.len() as u32)?;
		writer.write_all(value)?;
		return Ok(());
	}

	if let Some(method) = flags.encryption {
		if method < 0x80 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::InvalidEncryptionMethodSymbol(method)).into());
		}
	}

	let mut data = extra_header_data(flags, version)?;
	data.extend_from_slice(value);

	// Only ID3v2.4 has a frame level flag for this
	if version == Id3v2Version::V4 && unsynchronise {
		data = unsynchronize(&data, UnsynchronizationScheme::FalseSyncOnly);
		flags.unsynchronisation = true;
	}

	writer.write_all(id.as_bytes())?;
	match version {
		Id3v2Version::V4 => {
			writer.write_all(&encode_syncsafe(data.len() as u32)?)?;
			writer.write_u16::<BigEndian>(flags.as_id3v24_bytes())?;
		},
		_ => {
			writer.write_u32::<BigEndian>(data.len() as u32)?;
			writer.write_u16::<BigEndian>(flags.as_id3v23_bytes())?;
		},
	}

	writer.write_all(&data)?;
	Ok(())
}

// The bytes between the frame header and the frame body, in the version's order
fn extra_header_data(flags: FrameFlags, version: Id3v2Version) -> Result<Vec<u8>> {
	let mut extra = Vec::new();

	if version == Id3v2Version::V3 {
		if flags.compression {
			let Some(decompressed_len) = flags.data_length_indicator else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			};
			extra.write_u32::<BigEndian>(decompressed_len)?;
		}

		extra.extend(flags.encryption);
		extra.extend(flags.grouping_identity);
		return Ok(extra);
	}

	extra.extend(flags.grouping_identity);
	extra.extend(flags.encryption);
	match flags.data_length_indicator {
		Some(len) => extra.extend(encode_syncsafe(len)?),
		None if flags.encryption.is_some() => {
			return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
		},
		None => {},
	}

	Ok(extra)
}
