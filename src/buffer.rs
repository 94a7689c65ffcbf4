//! Buffers to safely work with audio samples in place.

use std::slice;

use num_traits::Float;

/// One block of audio, processed in place.
///
/// The host owns the sample memory; an `AudioBuffer` only borrows one slice per channel. Building
/// one from borrowed slices never allocates, so it can be created inside the audio callback.
pub struct AudioBuffer<'a, T: 'a + Float> {
    channels: &'a mut [&'a mut [T]],
    samples: usize,
}

impl<'a, T: 'a + Float> AudioBuffer<'a, T> {
    /// Wrap a set of channel slices.
    ///
    /// The block length is the length of the shortest channel. Samples past it are never touched.
    pub fn new(channels: &'a mut [&'a mut [T]]) -> AudioBuffer<'a, T> {
        let samples = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        debug_assert!(
            channels.iter().all(|c| c.len() == samples),
            "channels of one block must share a length"
        );
        AudioBuffer { channels, samples }
    }

    /// Number of samples per channel.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Whether the block holds no samples at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples == 0 || self.channels.is_empty()
    }

    /// Samples of channel `index`.
    pub fn channel(&self, index: usize) -> Option<&[T]> {
        let samples = self.samples;
        self.channels.get(index).map(|c| &c[..samples])
    }

    /// Mutable samples of channel `index`.
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [T]> {
        let samples = self.samples;
        self.channels.get_mut(index).map(|c| &mut c[..samples])
    }

    /// Iterate over all channels mutably, in channel order.
    pub fn iter_mut(&mut self) -> ChannelsMut<'_, 'a, T> {
        ChannelsMut {
            inner: self.channels.iter_mut(),
            samples: self.samples,
        }
    }

    /// Silence every channel.
    pub fn clear(&mut self) {
        for channel in self.iter_mut() {
            channel.iter_mut().for_each(|s| *s = T::zero());
        }
    }

    /// Silence channel `index`, if it exists.
    pub fn clear_channel(&mut self, index: usize) {
        if let Some(channel) = self.channel_mut(index) {
            channel.iter_mut().for_each(|s| *s = T::zero());
        }
    }
}

/// Mutable iterator over the channels of an [`AudioBuffer`].
pub struct ChannelsMut<'b, 'a: 'b, T: 'a + Float> {
    inner: slice::IterMut<'b, &'a mut [T]>,
    samples: usize,
}

impl<'b, 'a: 'b, T: 'a + Float> Iterator for ChannelsMut<'b, 'a, T> {
    type Item = &'b mut [T];

    fn next(&mut self) -> Option<&'b mut [T]> {
        let samples = self.samples;
        self.inner.next().map(|c| &mut c[..samples])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'b, 'a: 'b, T: 'a + Float> ExactSizeIterator for ChannelsMut<'b, 'a, T> {}
