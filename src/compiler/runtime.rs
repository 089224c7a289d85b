//! Assembly routines emitted into every module.

/// Converts the signed 64-bit integer in %rdi to decimal ASCII and writes it,
/// newline-terminated, to file descriptor 1. The magnitude runs through
/// unsigned division, so negating i64::MIN (which leaves the bit pattern
/// unchanged) still prints the right digits.
pub const PRINT_INT: &str = "
print_int:
	pushq	%rbp
	movq	%rsp, %rbp
	subq	$48, %rsp
	movq	%rdi, %rax
	xorq	%r9, %r9
	testq	%rax, %rax
	jns	.Lprint_int_digits
	movq	$1, %r9
	negq	%rax
.Lprint_int_digits:
	leaq	-8(%rbp), %rsi
	movb	$10, (%rsi)
	movq	$1, %rcx
	movq	$10, %r8
.Lprint_int_next:
	xorq	%rdx, %rdx
	divq	%r8
	addq	$48, %rdx
	decq	%rsi
	movb	%dl, (%rsi)
	incq	%rcx
	testq	%rax, %rax
	jnz	.Lprint_int_next
	testq	%r9, %r9
	jz	.Lprint_int_write
	decq	%rsi
	movb	$45, (%rsi)
	incq	%rcx
.Lprint_int_write:
	movq	%rcx, %rdx
	movq	$1, %rdi
	movq	$1, %rax
	syscall
	movq	%rbp, %rsp
	popq	%rbp
	ret"
;
