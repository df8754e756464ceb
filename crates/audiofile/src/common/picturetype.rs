//! Picture types shared by FLAC picture blocks and vorbis comments
use serde_with::SerializeDisplay;
use std::fmt::Display;

/// A picture type according to the ID3v2 APIC frame
#[expect(missing_docs)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, SerializeDisplay)]
pub enum PictureType {
	Other,
	PngFileIcon,
	OtherFileIcon,
	FrontCover,
	BackCover,
	LeafletPage,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	BandOrchestra,
	Composer,
	Lyricist,
	RecLocation,
	DuringRecording,
	DuringPerformance,
	VideoScreenCapture,
	ABrightColoredFish,
	Illustration,
	ArtistLogotype,
	PublisherLogotype,
}

impl PictureType {
	/// Map a picture type code to a [`PictureType`].
	/// Codes we don't know are [`PictureType::Other`].
	pub fn from_idx(idx: u32) -> Self {
		return match idx {
			1 => PictureType::PngFileIcon,
			2 => PictureType::OtherFileIcon,
			3 => PictureType::FrontCover,
			4 => PictureType::BackCover,
			5 => PictureType::LeafletPage,
			6 => PictureType::Media,
			7 => PictureType::LeadArtist,
			8 => PictureType::Artist,
			9 => PictureType::Conductor,
			10 => PictureType::BandOrchestra,
			11 => PictureType::Composer,
			12 => PictureType::Lyricist,
			13 => PictureType::RecLocation,
			14 => PictureType::DuringRecording,
			15 => PictureType::DuringPerformance,
			16 => PictureType::VideoScreenCapture,
			17 => PictureType::ABrightColoredFish,
			18 => PictureType::Illustration,
			19 => PictureType::ArtistLogotype,
			20 => PictureType::PublisherLogotype,
			_ => PictureType::Other,
		};
	}

	/// The code of this picture type
	pub fn to_idx(&self) -> u32 {
		return match self {
			PictureType::Other => 0,
			PictureType::PngFileIcon => 1,
			PictureType::OtherFileIcon => 2,
			PictureType::FrontCover => 3,
			PictureType::BackCover => 4,
			PictureType::LeafletPage => 5,
			PictureType::Media => 6,
			PictureType::LeadArtist => 7,
			PictureType::Artist => 8,
			PictureType::Conductor => 9,
			PictureType::BandOrchestra => 10,
			PictureType::Composer => 11,
			PictureType::Lyricist => 12,
			PictureType::RecLocation => 13,
			PictureType::DuringRecording => 14,
			PictureType::DuringPerformance => 15,
			PictureType::VideoScreenCapture => 16,
			PictureType::ABrightColoredFish => 17,
			PictureType::Illustration => 18,
			PictureType::ArtistLogotype => 19,
			PictureType::PublisherLogotype => 20,
		};
	}
}

impl Display for PictureType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}",
			match self {
				PictureType::Other => "Other",
				PictureType::PngFileIcon => "32x32 pixels file icon",
				PictureType::OtherFileIcon => "Other file icon",
				PictureType::FrontCover => "Cover (front)",
				PictureType::BackCover => "Cover (back)",
				PictureType::LeafletPage => "Leaflet page",
				PictureType::Media => "Media",
				PictureType::LeadArtist => "Lead artist/lead performer/soloist",
				PictureType::Artist => "Artist/performer",
				PictureType::Conductor => "Conductor",
				PictureType::BandOrchestra => "Band/Orchestra",
				PictureType::Composer => "Composer",
				PictureType::Lyricist => "Lyricist/text writer",
				PictureType::RecLocation => "Recording Location",
				PictureType::DuringRecording => "During recording",
				PictureType::DuringPerformance => "During performance",
				PictureType::VideoScreenCapture => "Movie/video screen capture",
				PictureType::ABrightColoredFish => "A bright coloured fish",
				PictureType::Illustration => "Illustration",
				PictureType::ArtistLogotype => "Band/artist logotype",
				PictureType::PublisherLogotype => "Publisher/Studio logotype",
			}
		)
	}
}
