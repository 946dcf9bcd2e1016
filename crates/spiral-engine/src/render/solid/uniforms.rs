use std::num::NonZeroU64;

use glam::Mat4;

use crate::paint::Color;

use super::program::UniformLocations;

/// Uniform slots allocated up front; the ring doubles when one frame needs more.
const INITIAL_SLOTS: u32 = 16;

/// Packs one draw's transform and color into a uniform-block image.
pub(super) fn pack_draw_uniform(locations: &UniformLocations, transform: &Mat4, color: Color) -> Vec<u8> {
    let mut bytes = vec![0u8; locations.block_size as usize];
    write_at(&mut bytes, locations.transform, bytemuck::bytes_of(transform));
    write_at(&mut bytes, locations.color, bytemuck::bytes_of(&color.to_array()));
    bytes
}

fn write_at(dst: &mut [u8], offset: u32, src: &[u8]) {
    let start = offset as usize;
    dst[start..start + src.len()].copy_from_slice(src);
}

/// Distance between consecutive slots, honoring the device's dynamic-offset alignment.
pub(super) fn slot_stride(block_size: u32, alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    u64::from(block_size).div_ceil(alignment) * alignment
}

/// Per-draw uniform slots addressed with dynamic offsets.
///
/// Every draw in a frame gets its own slot, so changing the color or transform
/// between two draws affects only the later one. The ring rewinds the first
/// time it sees a new frame index, so its size is bounded by the busiest frame.
pub(super) struct UniformRing {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    block_size: NonZeroU64,
    stride: u64,
    capacity: u32,
    next: u32,
    frame: Option<u64>,
}

impl UniformRing {
    pub(super) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        block_size: NonZeroU64,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = slot_stride(block_size.get() as u32, alignment);
        let (buffer, bind_group) = create_slots(device, layout, block_size, stride, INITIAL_SLOTS);

        Self {
            buffer,
            bind_group,
            block_size,
            stride,
            capacity: INITIAL_SLOTS,
            next: 0,
            frame: None,
        }
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    #[cfg(test)]
    pub(super) fn slots_used(&self) -> u32 {
        self.next
    }

    #[cfg(test)]
    pub(super) fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Writes `bytes` into the next free slot of `frame_index` and returns its
    /// dynamic offset.
    pub(super) fn push(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        frame_index: u64,
        bytes: &[u8],
    ) -> u32 {
        // Slots of the previous frame were consumed by its submission.
        if self.frame != Some(frame_index) {
            self.frame = Some(frame_index);
            self.next = 0;
        }

        if self.next == self.capacity {
            // Passes already recorded keep the old buffer alive until submission.
            let capacity = self.capacity.saturating_mul(2);
            let (buffer, bind_group) = create_slots(device, layout, self.block_size, self.stride, capacity);
            log::debug!("solid uniform ring grown to {capacity} slots");
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
            self.next = 0;
        }

        let offset = u64::from(self.next) * self.stride;
        queue.write_buffer(&self.buffer, offset, bytes);
        self.next += 1;

        offset as u32
    }
}

fn create_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    block_size: NonZeroU64,
    stride: u64,
    slots: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("spiral solid uniforms"),
        size: stride * u64::from(slots),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("spiral solid bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: super::program::UNIFORM_BINDING,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: Some(block_size),
            }),
        }],
    });

    (buffer, bind_group)
}
